pub mod memory;
mod model;
mod pg;
mod store;

pub use memory::MemoryStore;
pub use model::{
    Account, NewAccount, Pricing, ProviderDetails, ProviderStatus, Role, ServiceType,
};
pub use pg::PgAccountStore;
pub use store::{AccountStore, StoreError};
