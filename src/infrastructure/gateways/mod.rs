mod notification;
mod presence;

pub use notification::{
    DeliveryError, NoopNotificationGateway, NotificationGateway, WebhookNotificationGateway,
};
pub use presence::{NoopPresenceGateway, PresenceGateway};
