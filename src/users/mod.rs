//! User accounts: the domain record, the persistence port and the use cases
//! that orchestrate registration, login, lookup and soft deletion.

/// The `User` domain record.
pub mod model;
/// Persistence port implemented by the database adapters.
pub mod repository;
/// Register, login, get and delete use cases.
pub mod usecase;

pub use model::User;
pub use repository::UserRepository;
pub use usecase::{LoginOutcome, NewUser, UserUseCase};
