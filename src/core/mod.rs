//! Core business logic - framework-agnostic entity operations.
//!
//! Each module owns the operations of one entity; `lifecycle` provides the
//! soft-delete repository contract every entity opts into.

/// Enrollment contract operations and pair-uniqueness enforcement
pub mod contract;
/// Class group operations, membership, and live-member projections
pub mod group;
/// Sales lead operations
pub mod lead;
/// Lesson operations
pub mod lesson;
/// Timestamp + soft-delete lifecycle shared by every entity
pub mod lifecycle;
/// School payment operations
pub mod payment;
/// Product/course operations
pub mod product;
/// Student operations
pub mod student;
/// Teacher operations
pub mod teacher;
/// Teacher compensation operations
pub mod teacher_payment;
/// API user management and authentication
pub mod user;
