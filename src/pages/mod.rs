pub mod dashboard;
pub mod landing;
pub mod login;
pub mod prompt_optimizer;
