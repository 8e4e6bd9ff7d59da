// External collaborators: third-party identity verification and image storage

pub mod apple;
pub mod google;
pub mod images;

pub use apple::AppleAuthService;
pub use google::GoogleAuthService;
pub use images::ImageStore;

/// Outcome of a third-party identity token verification.
#[derive(Debug, Clone)]
pub struct VerifiedIdentity {
    pub subject: String,
    pub email: String,
}
