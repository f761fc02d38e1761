//! Standings ("ladder") documents and the polymorphic cell value type.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// The full standings document for a grade, possibly in several formats
/// (e.g. outright vs points-only).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaddersResponse {
    pub grade: LadderGrade,
    pub ladders: Vec<Ladder>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LadderGrade {
    pub id: String,
    pub name: String,
    pub organisation: Option<LadderOrganisation>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LadderOrganisation {
    pub id: String,
    pub name: Option<String>,
}

/// One ladder format: a column set plus one or more pools of ranked teams.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ladder {
    pub name: String,
    pub columns: Vec<LadderColumn>,
    pub pools: Vec<LadderPool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LadderColumn {
    pub id: String,
    pub heading: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LadderPool {
    pub teams: Vec<TeamStanding>,
}

impl LadderPool {
    /// Standings ordered by rank. Teams sharing a rank keep the order they
    /// arrived in (stable sort).
    pub fn standings_by_rank(&self) -> Vec<&TeamStanding> {
        let mut out: Vec<&TeamStanding> = self.teams.iter().collect();
        out.sort_by_key(|t| t.rank);
        out
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamStanding {
    pub id: String,
    pub display_name: String,
    pub owning_organisation: Option<TeamStandingOrganisation>,
    pub rank: i64,
    pub includes_adjustments: Option<bool>,
    pub includes_unofficial: Option<bool>,
    pub ladder_data: Vec<LadderDatum>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamStandingOrganisation {
    pub id: String,
}

/// One cell of a standing row: the column id and its value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LadderDatum {
    pub id: String,
    pub val: LadderValue,
}

/// Columns rendered with one fractional digit (over counts use the
/// cricket convention of balls-as-tenths, e.g. "82.3 overs").
const ONE_DECIMAL_COLUMNS: [&str; 2] = ["oversFaced", "oversBowled"];

/// Tolerance for treating a float as mathematically integral.
const INTEGRAL_EPSILON: f64 = 1e-9;

/// Integral floats at or above this magnitude keep their decimal rendering.
const INTEGRAL_DISPLAY_LIMIT: f64 = 1_000_000.0;

/// A standings cell value as it appears on the wire: an integer, a float
/// or free text, depending on the column.
#[derive(Debug, Clone, PartialEq)]
pub enum LadderValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl LadderValue {
    pub fn display(&self) -> String {
        self.display_for_column(None)
    }

    /// Deterministic display rendering. Floats that are integral (within
    /// 1e-9) and under a million in magnitude drop their fractional part;
    /// the over-count columns get one decimal, everything else three.
    pub fn display_for_column(&self, column_id: Option<&str>) -> String {
        match self {
            LadderValue::Int(v) => v.to_string(),
            LadderValue::Float(v) => {
                if (v - v.round()).abs() < INTEGRAL_EPSILON && v.abs() < INTEGRAL_DISPLAY_LIMIT {
                    format!("{}", v.round() as i64)
                } else if column_id.is_some_and(|id| ONE_DECIMAL_COLUMNS.contains(&id)) {
                    format!("{:.1}", v)
                } else {
                    format!("{:.3}", v)
                }
            }
            LadderValue::Text(s) => s.clone(),
        }
    }
}

impl<'de> Deserialize<'de> for LadderValue {
    /// Ordered fallback: integer, then float, then text. Anything else
    /// becomes integer zero rather than failing the whole ladder.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(match value {
            Value::Number(n) => match n.as_i64() {
                Some(i) => LadderValue::Int(i),
                None => LadderValue::Float(n.as_f64().unwrap_or(0.0)),
            },
            Value::String(s) => LadderValue::Text(s),
            _ => LadderValue::Int(0),
        })
    }
}

impl Serialize for LadderValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            LadderValue::Int(v) => serializer.serialize_i64(*v),
            LadderValue::Float(v) => serializer.serialize_f64(*v),
            LadderValue::Text(s) => serializer.serialize_str(s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(json: &str) -> LadderValue {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_decode_variants() {
        assert_eq!(decode("7"), LadderValue::Int(7));
        assert_eq!(decode("-3"), LadderValue::Int(-3));
        assert_eq!(decode("1.25"), LadderValue::Float(1.25));
        assert_eq!(decode("\"W\""), LadderValue::Text("W".to_string()));
    }

    #[test]
    fn test_decode_fallback_to_zero() {
        // Non-scalar values never fail; they become integer zero.
        assert_eq!(decode("true"), LadderValue::Int(0));
        assert_eq!(decode("null"), LadderValue::Int(0));
        assert_eq!(decode("[1,2]"), LadderValue::Int(0));
    }

    #[test]
    fn test_round_trip() {
        for value in [
            LadderValue::Int(42),
            LadderValue::Float(0.6667),
            LadderValue::Text("abandoned".to_string()),
        ] {
            let json = serde_json::to_string(&value).unwrap();
            let back: LadderValue = serde_json::from_str(&json).unwrap();
            assert_eq!(back, value);
        }
    }

    #[test]
    fn test_display_int() {
        assert_eq!(LadderValue::Int(146).display(), "146");
        assert_eq!(LadderValue::Int(-2).display(), "-2");
    }

    #[test]
    fn test_display_integral_float_drops_fraction() {
        assert_eq!(
            LadderValue::Float(146.0).display_for_column(Some("runsFor")),
            "146"
        );
        assert_eq!(LadderValue::Float(-5.0).display(), "-5");
    }

    #[test]
    fn test_display_near_integral_float() {
        // Within 1e-9 of an integer counts as integral.
        assert_eq!(LadderValue::Float(3.0000000001).display(), "3");
    }

    #[test]
    fn test_display_large_integral_float_keeps_decimals() {
        assert_eq!(LadderValue::Float(1_500_000.0).display(), "1500000.000");
    }

    #[test]
    fn test_display_one_decimal_columns() {
        assert_eq!(
            LadderValue::Float(12.3333).display_for_column(Some("oversFaced")),
            "12.3"
        );
        assert_eq!(
            LadderValue::Float(82.5).display_for_column(Some("oversBowled")),
            "82.5"
        );
    }

    #[test]
    fn test_display_three_decimals_default() {
        assert_eq!(
            LadderValue::Float(0.6667).display_for_column(Some("netRunRate")),
            "0.667"
        );
        assert_eq!(LadderValue::Float(0.6667).display(), "0.667");
    }

    #[test]
    fn test_display_text() {
        assert_eq!(
            LadderValue::Text("forfeit".to_string()).display_for_column(Some("oversFaced")),
            "forfeit"
        );
    }

    fn standing(id: &str, rank: i64) -> TeamStanding {
        TeamStanding {
            id: id.to_string(),
            display_name: id.to_string(),
            owning_organisation: None,
            rank,
            includes_adjustments: None,
            includes_unofficial: None,
            ladder_data: vec![],
        }
    }

    #[test]
    fn test_standings_by_rank_preserves_tie_order() {
        let pool = LadderPool {
            teams: vec![
                standing("c", 2),
                standing("a", 1),
                standing("b", 1),
                standing("d", 2),
            ],
        };
        let ids: Vec<&str> = pool
            .standings_by_rank()
            .iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(ids, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_parse_full_ladder_document() {
        let json = r#"{
            "grade": {"id":"g1","name":"A Grade","organisation":{"id":"o1","name":"Assoc"}},
            "ladders": [{
                "name": "Outright",
                "columns": [{"id":"points","heading":"Pts","description":null}],
                "pools": [{
                    "teams": [{
                        "id":"t1","displayName":"Northcote 1sts",
                        "owningOrganisation":{"id":"o2"},
                        "rank":1,
                        "includesAdjustments":false,
                        "ladderData":[{"id":"points","val":36},{"id":"netRunRate","val":1.2345},{"id":"note","val":"Q"}]
                    }]
                }]
            }]
        }"#;

        let response: LaddersResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.grade.name, "A Grade");
        let standing = &response.ladders[0].pools[0].teams[0];
        assert_eq!(standing.ladder_data[0].val, LadderValue::Int(36));
        assert_eq!(standing.ladder_data[1].val, LadderValue::Float(1.2345));
        assert_eq!(standing.ladder_data[2].val, LadderValue::Text("Q".to_string()));
    }
}
