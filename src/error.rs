use std::num::ParseFloatError;
use wasm_bindgen::JsValue;

#[derive(Debug, thiserror::Error)]
pub enum TrkPtError {
    #[error("XML parse error: {0}")]
    XmlParse(#[from] quick_xml::Error),

    #[error("Missing attribute '{attribute}' on <{element}>")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },

    #[error("Invalid value '{value}' for attribute '{attribute}' on <{element}>")]
    InvalidAttribute {
        element: &'static str,
        attribute: &'static str,
        value: String,
    },

    #[error("Invalid elevation '{text}': {source}")]
    InvalidElevation {
        text: String,
        #[source]
        source: ParseFloatError,
    },

    #[error("Unknown entity '&{0};'")]
    UnknownEntity(String),

    #[error("<trkpt> opened inside another <trkpt>")]
    NestedTrackPoint,

    #[error("Document ended inside an open <trkpt>")]
    UnterminatedTrackPoint,

    #[error("Invalid UTF-8 in XML content: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}

pub type Result<T> = std::result::Result<T, TrkPtError>;

impl From<TrkPtError> for JsValue {
    fn from(e: TrkPtError) -> Self {
        JsValue::from_str(&e.to_string())
    }
}
