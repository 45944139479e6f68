use serde::Deserialize;

/// Level ids run 1..=N in course order.
pub type LevelId = u32;
pub type ActId = u32;

#[derive(Debug, Deserialize, Clone)]
pub struct Level {
    pub meta: LevelMeta,
    pub content: LevelContent,
    pub quiz: Quiz,
}

impl Level {
    pub fn id(&self) -> LevelId {
        self.meta.id
    }

    pub fn act(&self) -> ActId {
        self.meta.act
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LevelMeta {
    pub id: LevelId,
    pub act: ActId,
    pub title: String,
    #[serde(default)]
    pub emoji: String,
    pub description: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LevelContent {
    #[serde(default)]
    pub video_url: Option<String>,
    pub article: String, // markdown source
}

#[derive(Debug, Deserialize, Clone)]
pub struct Quiz {
    pub question: String,
    pub options: Vec<QuizOption>,
}

impl Quiz {
    pub fn correct_index(&self) -> Option<usize> {
        self.options.iter().position(|o| o.correct)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct QuizOption {
    pub text: String,
    #[serde(default)]
    pub correct: bool,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct Act {
    pub id: ActId,
    pub name: String,
    #[serde(default)]
    pub subtitle: String,
}

#[derive(Debug, Deserialize)]
pub struct ActTable {
    #[serde(rename = "act", default)]
    pub acts: Vec<Act>,
}
