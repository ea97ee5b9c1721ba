//! The typed job-data catalog.
//!
//! One payload type per queue, bound at compile time through
//! [`JobPayload::QUEUE`]. The pairing is deliberately one-to-one: the two
//! invoice-paid queues and the twelve community billing queues get distinct
//! types even though their shapes coincide, because queue identity carries
//! processing semantics and a payload must not be enqueueable to the wrong
//! queue by accident.
//!
//! Payload types are pure data contracts. Each has a matching
//! [`PayloadSchema`] static describing the same shape for the dynamically
//! typed producer path; `schema_for` is the single source of truth binding
//! queue to schema.

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::queue::QueueName;
use crate::record::{
    ChannelRecord, ChargeRecord, CommunityRecord, CustomerRecord, DiscountRecord, InvoiceRecord,
    InviteRecipient, MessageRecord, ReactionRecord, SourceRecord, StripeInvoiceRecord,
    SubscriptionRecord, ThreadRecord, UserRecord,
};
use crate::record::{
    CHANNEL_RECORD, CHARGE_RECORD, COMMUNITY_RECORD, CUSTOMER_RECORD, DISCOUNT_RECORD,
    INVITE_RECIPIENT, INVOICE_RECORD, MESSAGE_RECORD, REACTION_RECORD, SOURCE_RECORD,
    STRIPE_INVOICE_RECORD, SUBSCRIPTION_RECORD, THREAD_RECORD, USER_RECORD,
};
use crate::schema::{FieldKind, FieldSpec, PayloadSchema};

/// A job payload bound to exactly one queue of the closed catalog.
///
/// The `QUEUE` constant makes the payload/queue pairing a compile-time fact:
/// `Producer::enqueue` takes the payload alone and the queue follows from the
/// type, so a statically-typed producer can never submit to the wrong queue.
pub trait JobPayload: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// The one queue this payload type belongs to.
    const QUEUE: QueueName;
}

/// Object-safe form of [`JobPayload`] for heterogeneous fan-out.
///
/// The dispatch router projects one domain event into payloads for several
/// queues; this trait lets those travel in one collection while staying
/// serializable (`erased_serde`) and queue-addressed.
pub trait ErasedJobPayload: erased_serde::Serialize + Send + Sync {
    /// The queue the underlying payload type is bound to.
    fn queue(&self) -> QueueName;
}

impl<P: JobPayload> ErasedJobPayload for P {
    fn queue(&self) -> QueueName {
        P::QUEUE
    }
}

impl Serialize for dyn ErasedJobPayload {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        erased_serde::serialize(self, serializer)
    }
}

/// Box a typed payload for the erased fan-out path.
pub fn erased<P: JobPayload>(payload: P) -> Box<dyn ErasedJobPayload> {
    Box::new(payload)
}

/// When a user last saw a thread: either epoch milliseconds or an instant.
///
/// Both encodings are accepted on the wire; which one arrives depends on the
/// producing client.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SeenTimestamp {
    EpochMillis(i64),
    Instant(DateTime<Utc>),
}

impl From<i64> for SeenTimestamp {
    fn from(millis: i64) -> Self {
        SeenTimestamp::EpochMillis(millis)
    }
}

impl From<DateTime<Utc>> for SeenTimestamp {
    fn from(instant: DateTime<Utc>) -> Self {
        SeenTimestamp::Instant(instant)
    }
}

// ---------------------------------------------------------------------------
// Notification payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadNotificationJobData {
    pub thread: ThreadRecord,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityNotificationJobData {
    pub community_id: String,
    pub user_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserThreadLastSeenJobData {
    pub thread_id: String,
    pub user_id: String,
    pub timestamp: SeenTimestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProInvoicePaidJobData {
    pub invoice: InvoiceRecord,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityInvoicePaidJobData {
    pub invoice: InvoiceRecord,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionNotificationJobData {
    pub reaction: ReactionRecord,
    pub user_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivateChannelRequestJobData {
    pub user_id: String,
    pub channel: ChannelRecord,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivateChannelInviteNotificationJobData {
    pub recipient: InviteRecipient,
    pub channel_id: String,
    pub sender_id: String,
    pub custom_message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityInviteNotificationJobData {
    pub recipient: InviteRecipient,
    pub community_id: String,
    pub sender_id: String,
    pub custom_message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelNotificationJobData {
    pub channel: ChannelRecord,
    pub user_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectMessageNotificationJobData {
    pub message: MessageRecord,
    pub user_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageNotificationJobData {
    pub message: MessageRecord,
}

// ---------------------------------------------------------------------------
// Email payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUserWelcomeEmailJobData {
    pub user: UserRecord,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCommunityWelcomeEmailJobData {
    pub user: UserRecord,
    pub community: CommunityRecord,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailValidationEmailJobData {
    pub email: String,
    pub user_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdministratorEmailValidationEmailJobData {
    pub email: String,
    pub user_id: String,
    pub community_id: String,
    pub community: CommunityRecord,
}

// ---------------------------------------------------------------------------
// Reputation payload
// ---------------------------------------------------------------------------

/// Reputation adjustment for a user action.
///
/// `event` stays a free-form string on the wire (`type`); the admissible set
/// belongs to the reputation service, not this contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReputationEventJobData {
    pub user_id: String,
    #[serde(rename = "type")]
    pub event: String,
    pub entity_id: String,
}

// ---------------------------------------------------------------------------
// Stripe webhook payloads (one typed record per subtype queue)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargeWebhookJobData {
    pub record: ChargeRecord,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerWebhookJobData {
    pub record: CustomerRecord,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceWebhookJobData {
    pub record: SourceRecord,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceWebhookJobData {
    pub record: StripeInvoiceRecord,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionWebhookJobData {
    pub record: SubscriptionRecord,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountWebhookJobData {
    pub record: DiscountRecord,
}

// ---------------------------------------------------------------------------
// Community billing payloads
// ---------------------------------------------------------------------------

macro_rules! community_billing_payloads {
    ($( $(#[$doc:meta])* $name:ident, $schema:ident => $queue:ident ),+ $(,)?) => {
        $(
            $(#[$doc])*
            #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
            #[serde(rename_all = "camelCase")]
            pub struct $name {
                pub community_id: String,
            }

            static $schema: PayloadSchema = PayloadSchema {
                name: stringify!($name),
                fields: &[FieldSpec {
                    name: "communityId",
                    kind: FieldKind::Reference,
                    required: true,
                }],
            };

            impl JobPayload for $name {
                const QUEUE: QueueName = QueueName::$queue;
            }
        )+
    };
}

community_billing_payloads! {
    /// Billing contact change for a community's Stripe customer.
    AdministratorEmailChangedJobData, ADMINISTRATOR_EMAIL_CHANGED => StripeCommunityAdministratorEmailChanged,
    AnalyticsAddedJobData, ANALYTICS_ADDED => StripeCommunityAnalyticsAdded,
    AnalyticsRemovedJobData, ANALYTICS_REMOVED => StripeCommunityAnalyticsRemoved,
    /// Provision the Stripe customer for a newly created community.
    CommunityBillingCreatedJobData, COMMUNITY_BILLING_CREATED => StripeCommunityCreated,
    CommunityBillingDeletedJobData, COMMUNITY_BILLING_DELETED => StripeCommunityDeleted,
    CommunityBillingEditedJobData, COMMUNITY_BILLING_EDITED => StripeCommunityEdited,
    ModeratorSeatAddedJobData, MODERATOR_SEAT_ADDED => StripeCommunityModeratorAdded,
    ModeratorSeatRemovedJobData, MODERATOR_SEAT_REMOVED => StripeCommunityModeratorRemoved,
    PrioritySupportAddedJobData, PRIORITY_SUPPORT_ADDED => StripeCommunityPrioritySupportAdded,
    PrioritySupportRemovedJobData, PRIORITY_SUPPORT_REMOVED => StripeCommunityPrioritySupportRemoved,
    PrivateChannelAddedJobData, PRIVATE_CHANNEL_ADDED => StripeCommunityPrivateChannelAdded,
    PrivateChannelRemovedJobData, PRIVATE_CHANNEL_REMOVED => StripeCommunityPrivateChannelRemoved,
}

// ---------------------------------------------------------------------------
// Admin payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminCommunityCreatedEmailJobData {
    pub user: UserRecord,
    pub community: CommunityRecord,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminToxicMessageJobData {
    pub message: MessageRecord,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminToxicThreadJobData {
    pub thread: ThreadRecord,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminSlackImportJobData {
    pub importer: UserRecord,
    pub community: CommunityRecord,
    pub invited_count: u32,
    pub team_name: String,
}

// ---------------------------------------------------------------------------
// Queue bindings
// ---------------------------------------------------------------------------

macro_rules! bind_queue {
    ($( $payload:ident => $queue:ident ),+ $(,)?) => {
        $(
            impl JobPayload for $payload {
                const QUEUE: QueueName = QueueName::$queue;
            }
        )+
    };
}

bind_queue! {
    ThreadNotificationJobData => SendThreadNotification,
    CommunityNotificationJobData => SendCommunityNotification,
    UserThreadLastSeenJobData => TrackUserThreadLastSeen,
    ProInvoicePaidJobData => SendProInvoicePaidNotification,
    CommunityInvoicePaidJobData => SendCommunityInvoicePaidNotification,
    ReactionNotificationJobData => SendReactionNotification,
    PrivateChannelRequestJobData => SendPrivateChannelRequest,
    PrivateChannelInviteNotificationJobData => SendPrivateChannelInviteNotification,
    CommunityInviteNotificationJobData => SendCommunityInviteNotification,
    ChannelNotificationJobData => SendChannelNotification,
    DirectMessageNotificationJobData => SendDirectMessageNotification,
    MessageNotificationJobData => SendMessageNotification,
    NewUserWelcomeEmailJobData => SendNewUserWelcomeEmail,
    NewCommunityWelcomeEmailJobData => SendNewCommunityWelcomeEmail,
    EmailValidationEmailJobData => SendEmailValidationEmail,
    AdministratorEmailValidationEmailJobData => SendAdministratorEmailValidationEmail,
    ReputationEventJobData => ProcessReputationEvent,
    ChargeWebhookJobData => StripeChargeWebhookEvent,
    CustomerWebhookJobData => StripeCustomerWebhookEvent,
    SourceWebhookJobData => StripeSourceWebhookEvent,
    InvoiceWebhookJobData => StripeInvoiceWebhookEvent,
    SubscriptionWebhookJobData => StripeSubscriptionWebhookEvent,
    DiscountWebhookJobData => StripeDiscountWebhookEvent,
    AdminCommunityCreatedEmailJobData => AdminSendCommunityCreatedEmail,
    AdminToxicMessageJobData => AdminProcessToxicMessage,
    AdminToxicThreadJobData => AdminProcessToxicThread,
    AdminSlackImportJobData => AdminProcessSlackImport,
}

// ---------------------------------------------------------------------------
// Schema statics
// ---------------------------------------------------------------------------

static THREAD_NOTIFICATION: PayloadSchema = PayloadSchema {
    name: "ThreadNotificationJobData",
    fields: &[FieldSpec {
        name: "thread",
        kind: FieldKind::Record(&THREAD_RECORD),
        required: true,
    }],
};

static COMMUNITY_NOTIFICATION: PayloadSchema = PayloadSchema {
    name: "CommunityNotificationJobData",
    fields: &[
        FieldSpec { name: "communityId", kind: FieldKind::Reference, required: true },
        FieldSpec { name: "userId", kind: FieldKind::Reference, required: true },
    ],
};

static USER_THREAD_LAST_SEEN: PayloadSchema = PayloadSchema {
    name: "UserThreadLastSeenJobData",
    fields: &[
        FieldSpec { name: "threadId", kind: FieldKind::Reference, required: true },
        FieldSpec { name: "userId", kind: FieldKind::Reference, required: true },
        FieldSpec { name: "timestamp", kind: FieldKind::Timestamp, required: true },
    ],
};

static PRO_INVOICE_PAID: PayloadSchema = PayloadSchema {
    name: "ProInvoicePaidJobData",
    fields: &[FieldSpec {
        name: "invoice",
        kind: FieldKind::Record(&INVOICE_RECORD),
        required: true,
    }],
};

static COMMUNITY_INVOICE_PAID: PayloadSchema = PayloadSchema {
    name: "CommunityInvoicePaidJobData",
    fields: &[FieldSpec {
        name: "invoice",
        kind: FieldKind::Record(&INVOICE_RECORD),
        required: true,
    }],
};

static REACTION_NOTIFICATION: PayloadSchema = PayloadSchema {
    name: "ReactionNotificationJobData",
    fields: &[
        FieldSpec { name: "reaction", kind: FieldKind::Record(&REACTION_RECORD), required: true },
        FieldSpec { name: "userId", kind: FieldKind::Reference, required: true },
    ],
};

static PRIVATE_CHANNEL_REQUEST: PayloadSchema = PayloadSchema {
    name: "PrivateChannelRequestJobData",
    fields: &[
        FieldSpec { name: "userId", kind: FieldKind::Reference, required: true },
        FieldSpec { name: "channel", kind: FieldKind::Record(&CHANNEL_RECORD), required: true },
    ],
};

static PRIVATE_CHANNEL_INVITE: PayloadSchema = PayloadSchema {
    name: "PrivateChannelInviteNotificationJobData",
    fields: &[
        FieldSpec { name: "recipient", kind: FieldKind::Record(&INVITE_RECIPIENT), required: true },
        FieldSpec { name: "channelId", kind: FieldKind::Reference, required: true },
        FieldSpec { name: "senderId", kind: FieldKind::Reference, required: true },
        FieldSpec { name: "customMessage", kind: FieldKind::Text, required: false },
    ],
};

static COMMUNITY_INVITE: PayloadSchema = PayloadSchema {
    name: "CommunityInviteNotificationJobData",
    fields: &[
        FieldSpec { name: "recipient", kind: FieldKind::Record(&INVITE_RECIPIENT), required: true },
        FieldSpec { name: "communityId", kind: FieldKind::Reference, required: true },
        FieldSpec { name: "senderId", kind: FieldKind::Reference, required: true },
        FieldSpec { name: "customMessage", kind: FieldKind::Text, required: false },
    ],
};

static CHANNEL_NOTIFICATION: PayloadSchema = PayloadSchema {
    name: "ChannelNotificationJobData",
    fields: &[
        FieldSpec { name: "channel", kind: FieldKind::Record(&CHANNEL_RECORD), required: true },
        FieldSpec { name: "userId", kind: FieldKind::Reference, required: true },
    ],
};

static DIRECT_MESSAGE_NOTIFICATION: PayloadSchema = PayloadSchema {
    name: "DirectMessageNotificationJobData",
    fields: &[
        FieldSpec { name: "message", kind: FieldKind::Record(&MESSAGE_RECORD), required: true },
        FieldSpec { name: "userId", kind: FieldKind::Reference, required: true },
    ],
};

static MESSAGE_NOTIFICATION: PayloadSchema = PayloadSchema {
    name: "MessageNotificationJobData",
    fields: &[FieldSpec {
        name: "message",
        kind: FieldKind::Record(&MESSAGE_RECORD),
        required: true,
    }],
};

static NEW_USER_WELCOME_EMAIL: PayloadSchema = PayloadSchema {
    name: "NewUserWelcomeEmailJobData",
    fields: &[FieldSpec {
        name: "user",
        kind: FieldKind::Record(&USER_RECORD),
        required: true,
    }],
};

static NEW_COMMUNITY_WELCOME_EMAIL: PayloadSchema = PayloadSchema {
    name: "NewCommunityWelcomeEmailJobData",
    fields: &[
        FieldSpec { name: "user", kind: FieldKind::Record(&USER_RECORD), required: true },
        FieldSpec { name: "community", kind: FieldKind::Record(&COMMUNITY_RECORD), required: true },
    ],
};

static EMAIL_VALIDATION_EMAIL: PayloadSchema = PayloadSchema {
    name: "EmailValidationEmailJobData",
    fields: &[
        FieldSpec { name: "email", kind: FieldKind::Text, required: true },
        FieldSpec { name: "userId", kind: FieldKind::Reference, required: true },
    ],
};

static ADMINISTRATOR_EMAIL_VALIDATION_EMAIL: PayloadSchema = PayloadSchema {
    name: "AdministratorEmailValidationEmailJobData",
    fields: &[
        FieldSpec { name: "email", kind: FieldKind::Text, required: true },
        FieldSpec { name: "userId", kind: FieldKind::Reference, required: true },
        FieldSpec { name: "communityId", kind: FieldKind::Reference, required: true },
        FieldSpec { name: "community", kind: FieldKind::Record(&COMMUNITY_RECORD), required: true },
    ],
};

static REPUTATION_EVENT: PayloadSchema = PayloadSchema {
    name: "ReputationEventJobData",
    fields: &[
        FieldSpec { name: "userId", kind: FieldKind::Reference, required: true },
        FieldSpec { name: "type", kind: FieldKind::Text, required: true },
        FieldSpec { name: "entityId", kind: FieldKind::Reference, required: true },
    ],
};

static CHARGE_WEBHOOK: PayloadSchema = PayloadSchema {
    name: "ChargeWebhookJobData",
    fields: &[FieldSpec {
        name: "record",
        kind: FieldKind::Record(&CHARGE_RECORD),
        required: true,
    }],
};

static CUSTOMER_WEBHOOK: PayloadSchema = PayloadSchema {
    name: "CustomerWebhookJobData",
    fields: &[FieldSpec {
        name: "record",
        kind: FieldKind::Record(&CUSTOMER_RECORD),
        required: true,
    }],
};

static SOURCE_WEBHOOK: PayloadSchema = PayloadSchema {
    name: "SourceWebhookJobData",
    fields: &[FieldSpec {
        name: "record",
        kind: FieldKind::Record(&SOURCE_RECORD),
        required: true,
    }],
};

static INVOICE_WEBHOOK: PayloadSchema = PayloadSchema {
    name: "InvoiceWebhookJobData",
    fields: &[FieldSpec {
        name: "record",
        kind: FieldKind::Record(&STRIPE_INVOICE_RECORD),
        required: true,
    }],
};

static SUBSCRIPTION_WEBHOOK: PayloadSchema = PayloadSchema {
    name: "SubscriptionWebhookJobData",
    fields: &[FieldSpec {
        name: "record",
        kind: FieldKind::Record(&SUBSCRIPTION_RECORD),
        required: true,
    }],
};

static DISCOUNT_WEBHOOK: PayloadSchema = PayloadSchema {
    name: "DiscountWebhookJobData",
    fields: &[FieldSpec {
        name: "record",
        kind: FieldKind::Record(&DISCOUNT_RECORD),
        required: true,
    }],
};

static ADMIN_COMMUNITY_CREATED_EMAIL: PayloadSchema = PayloadSchema {
    name: "AdminCommunityCreatedEmailJobData",
    fields: &[
        FieldSpec { name: "user", kind: FieldKind::Record(&USER_RECORD), required: true },
        FieldSpec { name: "community", kind: FieldKind::Record(&COMMUNITY_RECORD), required: true },
    ],
};

static ADMIN_TOXIC_MESSAGE: PayloadSchema = PayloadSchema {
    name: "AdminToxicMessageJobData",
    fields: &[FieldSpec {
        name: "message",
        kind: FieldKind::Record(&MESSAGE_RECORD),
        required: true,
    }],
};

static ADMIN_TOXIC_THREAD: PayloadSchema = PayloadSchema {
    name: "AdminToxicThreadJobData",
    fields: &[FieldSpec {
        name: "thread",
        kind: FieldKind::Record(&THREAD_RECORD),
        required: true,
    }],
};

static ADMIN_SLACK_IMPORT: PayloadSchema = PayloadSchema {
    name: "AdminSlackImportJobData",
    fields: &[
        FieldSpec { name: "importer", kind: FieldKind::Record(&USER_RECORD), required: true },
        FieldSpec { name: "community", kind: FieldKind::Record(&COMMUNITY_RECORD), required: true },
        FieldSpec { name: "invitedCount", kind: FieldKind::Integer, required: true },
        FieldSpec { name: "teamName", kind: FieldKind::Text, required: true },
    ],
};

/// The schema bound to a queue. Single source of truth for the catalog.
pub fn schema_for(queue: QueueName) -> &'static PayloadSchema {
    match queue {
        QueueName::SendThreadNotification => &THREAD_NOTIFICATION,
        QueueName::SendCommunityNotification => &COMMUNITY_NOTIFICATION,
        QueueName::TrackUserThreadLastSeen => &USER_THREAD_LAST_SEEN,
        QueueName::SendProInvoicePaidNotification => &PRO_INVOICE_PAID,
        QueueName::SendCommunityInvoicePaidNotification => &COMMUNITY_INVOICE_PAID,
        QueueName::SendReactionNotification => &REACTION_NOTIFICATION,
        QueueName::SendPrivateChannelRequest => &PRIVATE_CHANNEL_REQUEST,
        QueueName::SendPrivateChannelInviteNotification => &PRIVATE_CHANNEL_INVITE,
        QueueName::SendCommunityInviteNotification => &COMMUNITY_INVITE,
        QueueName::SendChannelNotification => &CHANNEL_NOTIFICATION,
        QueueName::SendDirectMessageNotification => &DIRECT_MESSAGE_NOTIFICATION,
        QueueName::SendMessageNotification => &MESSAGE_NOTIFICATION,
        QueueName::SendNewUserWelcomeEmail => &NEW_USER_WELCOME_EMAIL,
        QueueName::SendNewCommunityWelcomeEmail => &NEW_COMMUNITY_WELCOME_EMAIL,
        QueueName::SendEmailValidationEmail => &EMAIL_VALIDATION_EMAIL,
        QueueName::SendAdministratorEmailValidationEmail => &ADMINISTRATOR_EMAIL_VALIDATION_EMAIL,
        QueueName::ProcessReputationEvent => &REPUTATION_EVENT,
        QueueName::StripeChargeWebhookEvent => &CHARGE_WEBHOOK,
        QueueName::StripeCustomerWebhookEvent => &CUSTOMER_WEBHOOK,
        QueueName::StripeSourceWebhookEvent => &SOURCE_WEBHOOK,
        QueueName::StripeInvoiceWebhookEvent => &INVOICE_WEBHOOK,
        QueueName::StripeSubscriptionWebhookEvent => &SUBSCRIPTION_WEBHOOK,
        QueueName::StripeDiscountWebhookEvent => &DISCOUNT_WEBHOOK,
        QueueName::StripeCommunityAdministratorEmailChanged => &ADMINISTRATOR_EMAIL_CHANGED,
        QueueName::StripeCommunityAnalyticsAdded => &ANALYTICS_ADDED,
        QueueName::StripeCommunityAnalyticsRemoved => &ANALYTICS_REMOVED,
        QueueName::StripeCommunityCreated => &COMMUNITY_BILLING_CREATED,
        QueueName::StripeCommunityDeleted => &COMMUNITY_BILLING_DELETED,
        QueueName::StripeCommunityEdited => &COMMUNITY_BILLING_EDITED,
        QueueName::StripeCommunityModeratorAdded => &MODERATOR_SEAT_ADDED,
        QueueName::StripeCommunityModeratorRemoved => &MODERATOR_SEAT_REMOVED,
        QueueName::StripeCommunityPrioritySupportAdded => &PRIORITY_SUPPORT_ADDED,
        QueueName::StripeCommunityPrioritySupportRemoved => &PRIORITY_SUPPORT_REMOVED,
        QueueName::StripeCommunityPrivateChannelAdded => &PRIVATE_CHANNEL_ADDED,
        QueueName::StripeCommunityPrivateChannelRemoved => &PRIVATE_CHANNEL_REMOVED,
        QueueName::AdminSendCommunityCreatedEmail => &ADMIN_COMMUNITY_CREATED_EMAIL,
        QueueName::AdminProcessToxicMessage => &ADMIN_TOXIC_MESSAGE,
        QueueName::AdminProcessToxicThread => &ADMIN_TOXIC_THREAD,
        QueueName::AdminProcessSlackImport => &ADMIN_SLACK_IMPORT,
    }
}
