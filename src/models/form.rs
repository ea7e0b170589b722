use serde::{Deserialize, Serialize};

/// One entry of an opportunity's dynamic application form, declared by the
/// posting admin and rendered client-side. The backend only ever validates
/// against it, it never edits it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputField {
    pub field_name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub options: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Number,
    Select,
    File,
}

/// Static name/value display pair attached to a job posting. The value may be
/// a document URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtraField {
    pub field_name: String,
    pub field_value: String,
}
