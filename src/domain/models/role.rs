use serde_derive::Deserialize;
use serde_derive::Serialize;

/// Who authored a chat turn, as understood by the completion API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}
