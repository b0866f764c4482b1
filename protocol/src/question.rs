use serde::{Serialize, Deserialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Contestant {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub score: i32,
    #[serde(default)]
    pub eliminated: bool,
    #[serde(default)]
    pub photo: Option<String>,
}

/// A question as the question service stores it.
///
/// One record shape serves every stage: stage 1 fills `secenek_a..d`,
/// stage 3 fills `secenek_a..g`, stage 2 fills `secenekler`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RawQuestion {
    #[serde(default)]
    pub id: u32,
    #[serde(default)]
    pub soru_metni: String,
    #[serde(default)]
    pub secenek_a: Option<String>,
    #[serde(default)]
    pub secenek_b: Option<String>,
    #[serde(default)]
    pub secenek_c: Option<String>,
    #[serde(default)]
    pub secenek_d: Option<String>,
    #[serde(default)]
    pub secenek_e: Option<String>,
    #[serde(default)]
    pub secenek_f: Option<String>,
    #[serde(default)]
    pub secenek_g: Option<String>,
    #[serde(default)]
    pub dogru_cevap: Option<String>,
    #[serde(default)]
    pub puan: Option<u32>,
    #[serde(default)]
    pub ipucu: Option<String>,
    #[serde(default)]
    pub tarih: Option<String>,
    #[serde(default)]
    pub secenekler: Vec<RawStatement>,
}

impl RawQuestion {
    pub fn lettered_options(&self) -> [Option<&String>; 7] {
        [
            self.secenek_a.as_ref(),
            self.secenek_b.as_ref(),
            self.secenek_c.as_ref(),
            self.secenek_d.as_ref(),
            self.secenek_e.as_ref(),
            self.secenek_f.as_ref(),
            self.secenek_g.as_ref(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawStatement {
    Judged {
        metin: String,
        #[serde(default)]
        dogru_mu: Option<String>,
    },
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpinResult {
    pub result: String,
    pub spin_id: u64,
}

/// Persisted state of one stage-2 statement: `D` (true), `Y` (false) or unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OptionState {
    #[serde(rename = "D")]
    True,
    #[serde(rename = "Y")]
    False,
    #[serde(rename = "def")]
    Unset,
}

impl From<bool> for OptionState {
    fn from(is_true: bool) -> Self {
        if is_true { OptionState::True } else { OptionState::False }
    }
}
