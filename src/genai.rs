mod analysis;
mod api;
mod chat;
mod extraction;
mod gemini_request;
mod gemini_response;
mod persona;
pub mod prompts;

pub use self::analysis::*;
pub use self::api::*;
pub use self::chat::*;
pub use self::extraction::{
    extract_bill, extract_json, extract_or_manual_entry, parse_bill_extraction, BillInput,
    ExtractionError,
};
pub use self::gemini_request::*;
pub use self::gemini_response::GeminiResponse;
pub use self::persona::PersonaPrompt;
