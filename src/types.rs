//! BTMS Overlay Node - Type System
//!
//! - `token`: Decoded token variants and encodable token fields
//! - `admission`: Admission decisions and service metadata
//! - `record`: Index records, filters and paging
//! - `lookup`: Lookup questions, answers and framework event payloads

pub mod admission;
pub mod lookup;
pub mod record;
pub mod token;

pub use admission::{AdmissionDecision, ServiceMetadata};
pub use lookup::{
    HistorySelector, LookupAnswer, LookupFormula, LookupQuery, LookupQuestion,
    OutputAdmittedPayload, OutputSpentPayload,
};
pub use record::{Page, RecordFilter, SortOrder, TokenRecord};
pub use token::{DecodedToken, TokenFields, ISSUANCE_MARKER};
