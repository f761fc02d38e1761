use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamsResponse {
    pub teams: Vec<Team>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub id: String,
    pub name: String,
    pub grade: Option<TeamGrade>,
    pub grades: Option<Vec<TeamGrade>>,
}

impl Team {
    /// The grade this team is treated as competing in: its direct grade,
    /// else the first grade marked current, else the first listed grade.
    pub fn active_grade(&self) -> Option<&TeamGrade> {
        self.grade
            .as_ref()
            .or_else(|| {
                self.grades
                    .as_ref()
                    .and_then(|gs| gs.iter().find(|g| g.is_current == Some(true)))
            })
            .or_else(|| self.grades.as_ref().and_then(|gs| gs.first()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamGrade {
    pub id: String,
    pub name: String,
    pub is_current: Option<bool>,
    pub owning_organisation: Option<GradeOrganisation>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeOrganisation {
    pub id: String,
    pub name: Option<String>,
    pub short_name: Option<String>,
    pub logo_url: Option<String>,
}
