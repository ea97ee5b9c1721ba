//! The closed queue catalog.
//!
//! Every queue this layer dispatches to is a variant of [`QueueName`]. The
//! catalog is fixed at compile time: code that names a queue statically can
//! never hit an unknown-queue error, and the full set is enumerable for
//! registration, documentation, and codegen tooling.
//!
//! Wire names (the strings the backend sees) are stable identifiers and must
//! not change once jobs exist in a queue.

use std::fmt;

use crate::schema::PayloadSchema;

/// Which worker fleet consumes a queue.
///
/// Grouping mirrors the deployment split: one process per group, each
/// registering handlers only for its own queues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkerGroup {
    /// In-app and push notification senders.
    Notifier,
    /// Transactional email senders.
    Mailer,
    /// Reputation score updaters.
    Reputation,
    /// Stripe webhook and community billing processors.
    Billing,
    /// Moderation and operator tooling.
    Admin,
}

macro_rules! queue_catalog {
    ($( $(#[$doc:meta])* $variant:ident => ($wire:literal, $group:ident) ),+ $(,)?) => {
        /// A queue identifier from the closed catalog.
        ///
        /// Each variant pairs a stable wire name with exactly one payload
        /// schema (see [`QueueName::schema`]). Payload types are never shared
        /// between queues, even when structurally identical.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum QueueName {
            $( $(#[$doc])* $variant, )+
        }

        impl QueueName {
            /// Every queue in the catalog, in declaration order.
            pub const ALL: &'static [QueueName] = &[ $( QueueName::$variant, )+ ];

            /// The stable wire name used at the backend boundary.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( QueueName::$variant => $wire, )+
                }
            }

            /// Parse a wire name back into a catalog entry.
            ///
            /// Returns `None` for names outside the closed catalog; callers
            /// that need an error use the registry's string lookup.
            pub fn parse(name: &str) -> Option<QueueName> {
                match name {
                    $( $wire => Some(QueueName::$variant), )+
                    _ => None,
                }
            }

            /// The worker fleet that consumes this queue.
            pub fn group(&self) -> WorkerGroup {
                match self {
                    $( QueueName::$variant => WorkerGroup::$group, )+
                }
            }
        }
    };
}

queue_catalog! {
    /// New thread published in a channel the recipient follows.
    SendThreadNotification => ("sendThreadNotificationQueue", Notifier),
    /// Activity in a community the recipient belongs to.
    SendCommunityNotification => ("sendCommunityNotificationQueue", Notifier),
    /// Records when a user last viewed a thread.
    TrackUserThreadLastSeen => ("trackUserThreadLastSeenQueue", Notifier),
    /// Pro subscription invoice settled.
    SendProInvoicePaidNotification => ("sendProInvoicePaidNotificationQueue", Notifier),
    /// Community subscription invoice settled.
    SendCommunityInvoicePaidNotification => ("sendCommunityInvoicePaidNotificationQueue", Notifier),
    /// Someone reacted to the recipient's message.
    SendReactionNotification => ("sendReactionNotificationQueue", Notifier),
    /// Request to join a private channel, delivered to its owners.
    SendPrivateChannelRequest => ("sendPrivateChannelRequestQueue", Notifier),
    /// Invitation into a private channel.
    SendPrivateChannelInviteNotification => ("sendPrivateChannelInviteNotificationQueue", Notifier),
    /// Invitation into a community.
    SendCommunityInviteNotification => ("sendCommunityInviteNotificationQueue", Notifier),
    /// New channel created in a community the recipient belongs to.
    SendChannelNotification => ("sendChannelNotificationQueue", Notifier),
    /// New direct message for the recipient.
    SendDirectMessageNotification => ("sendDirectMessageNotificationQueue", Notifier),
    /// New message in a thread the recipient participates in.
    SendMessageNotification => ("sendMessageNotificationQueue", Notifier),

    /// Welcome email after signup.
    SendNewUserWelcomeEmail => ("sendNewUserWelcomeEmailQueue", Mailer),
    /// Welcome email after creating a community.
    SendNewCommunityWelcomeEmail => ("sendNewCommunityWelcomeEmailQueue", Mailer),
    /// Address-confirmation email.
    SendEmailValidationEmail => ("sendEmailValidationEmailQueue", Mailer),
    /// Address-confirmation email for a community administrator.
    SendAdministratorEmailValidationEmail => ("sendAdministratorEmailValidationEmailQueue", Mailer),

    /// Reputation score adjustment for a user action.
    ProcessReputationEvent => ("processReputationEventQueue", Reputation),

    StripeChargeWebhookEvent => ("stripeChargeWebhookEventQueue", Billing),
    StripeCustomerWebhookEvent => ("stripeCustomerWebhookEventQueue", Billing),
    StripeSourceWebhookEvent => ("stripeSourceWebhookEventQueue", Billing),
    StripeInvoiceWebhookEvent => ("stripeInvoiceWebhookEventQueue", Billing),
    StripeSubscriptionWebhookEvent => ("stripeSubscriptionWebhookEventQueue", Billing),
    StripeDiscountWebhookEvent => ("stripeDiscountWebhookEventQueue", Billing),

    StripeCommunityAdministratorEmailChanged => ("stripeCommunityAdministratorEmailChangedQueue", Billing),
    StripeCommunityAnalyticsAdded => ("stripeCommunityAnalyticsAddedQueue", Billing),
    StripeCommunityAnalyticsRemoved => ("stripeCommunityAnalyticsRemovedQueue", Billing),
    StripeCommunityCreated => ("stripeCommunityCreatedQueue", Billing),
    StripeCommunityDeleted => ("stripeCommunityDeletedQueue", Billing),
    StripeCommunityEdited => ("stripeCommunityEditedQueue", Billing),
    StripeCommunityModeratorAdded => ("stripeCommunityModeratorAddedQueue", Billing),
    StripeCommunityModeratorRemoved => ("stripeCommunityModeratorRemovedQueue", Billing),
    StripeCommunityPrioritySupportAdded => ("stripeCommunityPrioritySupportAddedQueue", Billing),
    StripeCommunityPrioritySupportRemoved => ("stripeCommunityPrioritySupportRemovedQueue", Billing),
    StripeCommunityPrivateChannelAdded => ("stripeCommunityPrivateChannelAddedQueue", Billing),
    StripeCommunityPrivateChannelRemoved => ("stripeCommunityPrivateChannelRemovedQueue", Billing),

    /// Operator email when a community is created.
    AdminSendCommunityCreatedEmail => ("_adminSendCommunityCreatedEmailQueue", Admin),
    /// Message flagged by toxicity classification, queued for review.
    AdminProcessToxicMessage => ("_adminProcessToxicMessageQueue", Admin),
    /// Thread flagged by toxicity classification, queued for review.
    AdminProcessToxicThread => ("_adminProcessToxicThreadQueue", Admin),
    /// Post-import bookkeeping after a Slack workspace import.
    AdminProcessSlackImport => ("_adminProcessSlackImportQueue", Admin),
}

impl QueueName {
    /// The payload schema bound to this queue.
    pub fn schema(&self) -> &'static PayloadSchema {
        crate::payload::schema_for(*self)
    }
}

impl fmt::Display for QueueName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
