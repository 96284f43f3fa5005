mod request;

pub use request::{ChatRequest, SuggestedQuestions};
