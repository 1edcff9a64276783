pub mod certificate;
pub mod enums;
pub mod medicine;
pub mod patient;
pub mod physician;
pub mod prescription;
pub mod school;
pub mod security;
pub mod training;
pub mod validation;

pub use certificate::*;
pub use enums::*;
pub use medicine::*;
pub use patient::*;
pub use physician::*;
pub use prescription::*;
pub use school::*;
pub use security::*;
pub use training::*;
