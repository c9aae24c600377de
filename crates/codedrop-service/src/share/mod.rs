//! Share codes: generation, issuance, redemption, and purging.

pub mod code;
pub mod issuance;
pub mod purge;
pub mod redemption;

#[cfg(test)]
pub(crate) mod testing;

pub use code::CodeGenerator;
pub use issuance::{IssuanceService, IssueInput, UploadTicket};
pub use purge::PurgeService;
pub use redemption::RedemptionService;
