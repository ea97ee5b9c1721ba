//! Boundary records supplied by the database layer.
//!
//! These are pure data contracts: the dispatch layer never loads or stores
//! them, it only carries them inside job payloads. Fields are the subset the
//! downstream consumers (notification senders, mailers, billing processors)
//! actually read. Catalog records serialize with camelCase wire names; the
//! Stripe records keep Stripe's snake_case wire format.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::schema::{FieldKind, FieldSpec, PayloadSchema};

/// A published thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadRecord {
    pub id: String,
    pub creator_id: String,
    pub channel_id: String,
    pub community_id: String,
    pub title: String,
    pub body: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A message in a thread or direct-message conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRecord {
    pub id: String,
    pub sender_id: String,
    pub thread_id: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// A reaction left on a message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionRecord {
    pub id: String,
    pub message_id: String,
    pub user_id: String,
    pub kind: String,
    pub created_at: DateTime<Utc>,
}

/// A channel within a community.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelRecord {
    pub id: String,
    pub community_id: String,
    pub name: String,
    pub is_private: bool,
}

/// A community.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityRecord {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
}

/// A registered user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: String,
    pub name: String,
    pub username: Option<String>,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A settled subscription invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceRecord {
    pub id: String,
    pub customer_id: String,
    pub community_id: Option<String>,
    pub amount: i64,
    pub paid_at: DateTime<Utc>,
}

/// Recipient of a channel or community invitation. May not be a registered
/// user yet, so only the email address is mandatory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteRecipient {
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

// ---------------------------------------------------------------------------
// Stripe webhook records
// ---------------------------------------------------------------------------

/// A Stripe webhook object, tagged by Stripe's `object` discriminator.
///
/// The raw webhook body arrives as an untyped blob at the HTTP boundary;
/// decoding into this enum there means every queue downstream carries a
/// typed record instead of threading JSON through the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "object", rename_all = "snake_case")]
pub enum StripeRecord {
    Charge(ChargeRecord),
    Customer(CustomerRecord),
    Source(SourceRecord),
    Invoice(StripeInvoiceRecord),
    Subscription(SubscriptionRecord),
    Discount(DiscountRecord),
}

/// A Stripe charge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChargeRecord {
    pub id: String,
    pub customer: String,
    pub amount: i64,
    pub currency: String,
    pub paid: bool,
}

/// A Stripe customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerRecord {
    pub id: String,
    pub email: Option<String>,
}

/// A Stripe payment source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRecord {
    pub id: String,
    pub customer: String,
    pub status: String,
}

/// A Stripe invoice (distinct from the application's [`InvoiceRecord`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StripeInvoiceRecord {
    pub id: String,
    pub customer: String,
    pub subscription: Option<String>,
    pub amount_due: i64,
    pub paid: bool,
}

/// A Stripe subscription.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionRecord {
    pub id: String,
    pub customer: String,
    pub status: String,
}

/// A Stripe discount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscountRecord {
    pub customer: String,
    pub coupon: String,
}

// ---------------------------------------------------------------------------
// Record schemas (nested-record metadata used by the payload catalog)
// ---------------------------------------------------------------------------

pub(crate) static THREAD_RECORD: PayloadSchema = PayloadSchema {
    name: "ThreadRecord",
    fields: &[
        FieldSpec { name: "id", kind: FieldKind::Reference, required: true },
        FieldSpec { name: "creatorId", kind: FieldKind::Reference, required: true },
        FieldSpec { name: "channelId", kind: FieldKind::Reference, required: true },
        FieldSpec { name: "communityId", kind: FieldKind::Reference, required: true },
        FieldSpec { name: "title", kind: FieldKind::Text, required: true },
        FieldSpec { name: "body", kind: FieldKind::Text, required: false },
        FieldSpec { name: "createdAt", kind: FieldKind::Timestamp, required: true },
    ],
};

pub(crate) static MESSAGE_RECORD: PayloadSchema = PayloadSchema {
    name: "MessageRecord",
    fields: &[
        FieldSpec { name: "id", kind: FieldKind::Reference, required: true },
        FieldSpec { name: "senderId", kind: FieldKind::Reference, required: true },
        FieldSpec { name: "threadId", kind: FieldKind::Reference, required: true },
        FieldSpec { name: "body", kind: FieldKind::Text, required: true },
        FieldSpec { name: "createdAt", kind: FieldKind::Timestamp, required: true },
    ],
};

pub(crate) static REACTION_RECORD: PayloadSchema = PayloadSchema {
    name: "ReactionRecord",
    fields: &[
        FieldSpec { name: "id", kind: FieldKind::Reference, required: true },
        FieldSpec { name: "messageId", kind: FieldKind::Reference, required: true },
        FieldSpec { name: "userId", kind: FieldKind::Reference, required: true },
        FieldSpec { name: "kind", kind: FieldKind::Text, required: true },
        FieldSpec { name: "createdAt", kind: FieldKind::Timestamp, required: true },
    ],
};

pub(crate) static CHANNEL_RECORD: PayloadSchema = PayloadSchema {
    name: "ChannelRecord",
    fields: &[
        FieldSpec { name: "id", kind: FieldKind::Reference, required: true },
        FieldSpec { name: "communityId", kind: FieldKind::Reference, required: true },
        FieldSpec { name: "name", kind: FieldKind::Text, required: true },
        FieldSpec { name: "isPrivate", kind: FieldKind::Boolean, required: true },
    ],
};

pub(crate) static COMMUNITY_RECORD: PayloadSchema = PayloadSchema {
    name: "CommunityRecord",
    fields: &[
        FieldSpec { name: "id", kind: FieldKind::Reference, required: true },
        FieldSpec { name: "name", kind: FieldKind::Text, required: true },
        FieldSpec { name: "slug", kind: FieldKind::Text, required: true },
        FieldSpec { name: "createdAt", kind: FieldKind::Timestamp, required: true },
    ],
};

pub(crate) static USER_RECORD: PayloadSchema = PayloadSchema {
    name: "UserRecord",
    fields: &[
        FieldSpec { name: "id", kind: FieldKind::Reference, required: true },
        FieldSpec { name: "name", kind: FieldKind::Text, required: true },
        FieldSpec { name: "username", kind: FieldKind::Text, required: false },
        FieldSpec { name: "email", kind: FieldKind::Text, required: false },
        FieldSpec { name: "createdAt", kind: FieldKind::Timestamp, required: true },
    ],
};

pub(crate) static INVOICE_RECORD: PayloadSchema = PayloadSchema {
    name: "InvoiceRecord",
    fields: &[
        FieldSpec { name: "id", kind: FieldKind::Reference, required: true },
        FieldSpec { name: "customerId", kind: FieldKind::Reference, required: true },
        FieldSpec { name: "communityId", kind: FieldKind::Reference, required: false },
        FieldSpec { name: "amount", kind: FieldKind::Integer, required: true },
        FieldSpec { name: "paidAt", kind: FieldKind::Timestamp, required: true },
    ],
};

pub(crate) static INVITE_RECIPIENT: PayloadSchema = PayloadSchema {
    name: "InviteRecipient",
    fields: &[
        FieldSpec { name: "email", kind: FieldKind::Text, required: true },
        FieldSpec { name: "firstName", kind: FieldKind::Text, required: false },
        FieldSpec { name: "lastName", kind: FieldKind::Text, required: false },
    ],
};

pub(crate) static CHARGE_RECORD: PayloadSchema = PayloadSchema {
    name: "ChargeRecord",
    fields: &[
        FieldSpec { name: "id", kind: FieldKind::Reference, required: true },
        FieldSpec { name: "customer", kind: FieldKind::Reference, required: true },
        FieldSpec { name: "amount", kind: FieldKind::Integer, required: true },
        FieldSpec { name: "currency", kind: FieldKind::Text, required: true },
        FieldSpec { name: "paid", kind: FieldKind::Boolean, required: true },
    ],
};

pub(crate) static CUSTOMER_RECORD: PayloadSchema = PayloadSchema {
    name: "CustomerRecord",
    fields: &[
        FieldSpec { name: "id", kind: FieldKind::Reference, required: true },
        FieldSpec { name: "email", kind: FieldKind::Text, required: false },
    ],
};

pub(crate) static SOURCE_RECORD: PayloadSchema = PayloadSchema {
    name: "SourceRecord",
    fields: &[
        FieldSpec { name: "id", kind: FieldKind::Reference, required: true },
        FieldSpec { name: "customer", kind: FieldKind::Reference, required: true },
        FieldSpec { name: "status", kind: FieldKind::Text, required: true },
    ],
};

pub(crate) static STRIPE_INVOICE_RECORD: PayloadSchema = PayloadSchema {
    name: "StripeInvoiceRecord",
    fields: &[
        FieldSpec { name: "id", kind: FieldKind::Reference, required: true },
        FieldSpec { name: "customer", kind: FieldKind::Reference, required: true },
        FieldSpec { name: "subscription", kind: FieldKind::Reference, required: false },
        FieldSpec { name: "amount_due", kind: FieldKind::Integer, required: true },
        FieldSpec { name: "paid", kind: FieldKind::Boolean, required: true },
    ],
};

pub(crate) static SUBSCRIPTION_RECORD: PayloadSchema = PayloadSchema {
    name: "SubscriptionRecord",
    fields: &[
        FieldSpec { name: "id", kind: FieldKind::Reference, required: true },
        FieldSpec { name: "customer", kind: FieldKind::Reference, required: true },
        FieldSpec { name: "status", kind: FieldKind::Text, required: true },
    ],
};

pub(crate) static DISCOUNT_RECORD: PayloadSchema = PayloadSchema {
    name: "DiscountRecord",
    fields: &[
        FieldSpec { name: "customer", kind: FieldKind::Reference, required: true },
        FieldSpec { name: "coupon", kind: FieldKind::Reference, required: true },
    ],
};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_catalog_records_use_camel_case() {
        let reaction = ReactionRecord {
            id: "r1".into(),
            message_id: "m1".into(),
            user_id: "u1".into(),
            kind: "like".into(),
            created_at: Utc::now(),
        };
        let value = serde_json::to_value(&reaction).unwrap();
        assert!(value.get("messageId").is_some());
        assert!(value.get("message_id").is_none());
    }

    #[test]
    fn test_serialized_record_passes_its_schema() {
        let thread = ThreadRecord {
            id: "t1".into(),
            creator_id: "u1".into(),
            channel_id: "c1".into(),
            community_id: "co1".into(),
            title: "hello".into(),
            body: None,
            created_at: Utc::now(),
        };
        let value = serde_json::to_value(&thread).unwrap();
        THREAD_RECORD.validate(&value).unwrap();
    }

    #[test]
    fn test_stripe_record_tagging() {
        let record = StripeRecord::Charge(ChargeRecord {
            id: "ch_1".into(),
            customer: "cus_1".into(),
            amount: 500,
            currency: "usd".into(),
            paid: true,
        });
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["object"], json!("charge"));
        assert_eq!(value["amount"], json!(500));

        let back: StripeRecord = serde_json::from_value(value).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_stripe_records_keep_snake_case() {
        let invoice = StripeInvoiceRecord {
            id: "in_1".into(),
            customer: "cus_1".into(),
            subscription: Some("sub_1".into()),
            amount_due: 2000,
            paid: false,
        };
        let value = serde_json::to_value(&invoice).unwrap();
        assert!(value.get("amount_due").is_some());
        assert!(value.get("amountDue").is_none());
        STRIPE_INVOICE_RECORD.validate(&value).unwrap();
    }

    #[test]
    fn test_bare_stripe_record_passes_its_schema() {
        let charge = ChargeRecord {
            id: "ch_1".into(),
            customer: "cus_1".into(),
            amount: 500,
            currency: "usd".into(),
            paid: true,
        };
        let value = serde_json::to_value(&charge).unwrap();
        CHARGE_RECORD.validate(&value).unwrap();
    }

    #[test]
    fn test_invite_recipient_optional_names() {
        let value = json!({ "email": "new@example.com" });
        let recipient: InviteRecipient = serde_json::from_value(value.clone()).unwrap();
        assert!(recipient.first_name.is_none());
        INVITE_RECIPIENT.validate(&value).unwrap();
    }
}
