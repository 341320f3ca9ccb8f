pub mod user;
pub mod revenue;
pub mod usage;
pub mod campaign;

pub use user::{AnalyticsUser, SubscriptionTier, AcquisitionChannel};
pub use revenue::RevenuePeriod;
pub use usage::UsageRecord;
pub use campaign::Campaign;
