pub mod parse;
pub mod solve;
pub mod wrong_answer;

pub use parse::{ParseRequest, ParseResponse, ParseSource, ParsedPayload, ParsedProblem};
pub use solve::SolveRequest;
pub use wrong_answer::{record_from_body, SaveWrongResponse};
