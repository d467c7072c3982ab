pub mod clans;
pub mod inbox;
pub mod poller;

pub use clans::ClanDirectory;
pub use inbox::NotificationInbox;
pub use poller::{run_live_poller, run_notification_poller};
