//! The dispatch router: domain events to queue fan-out.
//!
//! [`Router::routes`] is the static table - a pure, synchronous function
//! from a [`DomainEvent`] to the payloads each target queue receives. All
//! routing decisions live there, inspectable and testable without IO.
//! [`Router::dispatch`] then enqueues each projection through the producer
//! contract.
//!
//! # Semantics
//!
//! - An event projecting to N queues yields exactly N enqueue calls, one per
//!   mapped queue. A queue never receives more than one job per invocation
//!   for the same event unless the table explicitly duplicates it.
//! - An event with no table entry is a **no-op, not an error**: producers
//!   extend the table when adding event types, they are not blocked by
//!   omissions.
//! - Fan-out list order is not an execution-order guarantee. Nothing beyond
//!   enqueue acknowledgment is awaited.

use smallvec::SmallVec;
use tracing::debug;

use crate::error::EnqueueError;
use crate::job::JobHandle;
use crate::payload::{
    erased, AdminCommunityCreatedEmailJobData, AdminSlackImportJobData, AdminToxicMessageJobData,
    AdminToxicThreadJobData, AdministratorEmailChangedJobData,
    AdministratorEmailValidationEmailJobData, AnalyticsAddedJobData, AnalyticsRemovedJobData,
    ChannelNotificationJobData, ChargeWebhookJobData, CommunityBillingCreatedJobData,
    CommunityBillingDeletedJobData, CommunityBillingEditedJobData, CommunityInviteNotificationJobData,
    CommunityInvoicePaidJobData, CommunityNotificationJobData, CustomerWebhookJobData,
    DirectMessageNotificationJobData, DiscountWebhookJobData, EmailValidationEmailJobData,
    ErasedJobPayload, InvoiceWebhookJobData, MessageNotificationJobData, ModeratorSeatAddedJobData,
    ModeratorSeatRemovedJobData, NewCommunityWelcomeEmailJobData, NewUserWelcomeEmailJobData,
    PrioritySupportAddedJobData, PrioritySupportRemovedJobData, PrivateChannelAddedJobData,
    PrivateChannelInviteNotificationJobData, PrivateChannelRemovedJobData,
    PrivateChannelRequestJobData, ProInvoicePaidJobData, ReactionNotificationJobData,
    ReputationEventJobData, SeenTimestamp, SourceWebhookJobData, SubscriptionWebhookJobData,
    ThreadNotificationJobData, UserThreadLastSeenJobData,
};
use crate::producer::Producer;
use crate::record::{
    ChannelRecord, CommunityRecord, InviteRecipient, InvoiceRecord, MessageRecord, ReactionRecord,
    StripeRecord, ThreadRecord, UserRecord,
};

/// A domain event raised by application logic.
///
/// Events are facts about what happened at the edge; the router decides
/// which queues must hear about each one.
#[derive(Debug, Clone)]
pub enum DomainEvent {
    /// A thread was published.
    ThreadPublished {
        thread: ThreadRecord,
        /// Set when toxicity classification flagged the content.
        toxicity_flagged: bool,
    },
    /// A thread was edited. Deliberately unmapped: edits notify nobody.
    ThreadEdited { thread: ThreadRecord },
    /// A user viewed a thread.
    ThreadSeen {
        thread_id: String,
        user_id: String,
        timestamp: SeenTimestamp,
    },
    /// A message was posted to a thread.
    MessagePosted {
        message: MessageRecord,
        toxicity_flagged: bool,
    },
    /// A direct message was sent.
    DirectMessagePosted {
        message: MessageRecord,
        recipient_id: String,
    },
    /// Someone reacted to a message.
    ReactionAdded {
        reaction: ReactionRecord,
        user_id: String,
    },
    /// A channel was created.
    ChannelCreated {
        channel: ChannelRecord,
        user_id: String,
    },
    /// A user asked to join a private channel.
    PrivateChannelRequested {
        channel: ChannelRecord,
        user_id: String,
    },
    /// Someone was invited into a private channel.
    PrivateChannelInviteSent {
        recipient: InviteRecipient,
        channel_id: String,
        sender_id: String,
        custom_message: Option<String>,
    },
    /// Someone was invited into a community.
    CommunityInviteSent {
        recipient: InviteRecipient,
        community_id: String,
        sender_id: String,
        custom_message: Option<String>,
    },
    /// A user joined a community.
    UserJoinedCommunity {
        community_id: String,
        user_id: String,
    },
    /// A user signed up.
    UserCreated { user: UserRecord },
    /// A user added an email address needing confirmation.
    EmailAdded { email: String, user_id: String },
    /// A community administrator set a contact email needing confirmation.
    AdministratorEmailAdded {
        email: String,
        user_id: String,
        community_id: String,
        community: CommunityRecord,
    },
    /// A community was created.
    CommunityCreated {
        creator: UserRecord,
        community: CommunityRecord,
    },
    /// A community's billing-relevant settings changed.
    CommunityChanged {
        community_id: String,
        change: CommunityChange,
    },
    /// A pro subscription invoice was paid.
    ProInvoicePaid { invoice: InvoiceRecord },
    /// A community subscription invoice was paid.
    CommunityInvoicePaid { invoice: InvoiceRecord },
    /// A user action affected reputation.
    ReputationChanged {
        user_id: String,
        event: String,
        entity_id: String,
    },
    /// A verified Stripe webhook arrived, already decoded by subtype.
    StripeWebhookReceived { record: StripeRecord },
    /// A Slack workspace import finished.
    SlackImportFinished {
        importer: UserRecord,
        community: CommunityRecord,
        invited_count: u32,
        team_name: String,
    },
}

/// Billing-relevant community mutations, each mapped to its own queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommunityChange {
    AdministratorEmailChanged,
    AnalyticsAdded,
    AnalyticsRemoved,
    Deleted,
    Edited,
    ModeratorAdded,
    ModeratorRemoved,
    PrioritySupportAdded,
    PrioritySupportRemoved,
    PrivateChannelAdded,
    PrivateChannelRemoved,
}

/// Fan-out list for one router invocation. Most events target one or two
/// queues.
pub type FanOut = SmallVec<[Box<dyn ErasedJobPayload>; 2]>;

/// Routes domain events into queues through a [`Producer`].
#[derive(Debug, Clone)]
pub struct Router {
    producer: Producer,
}

impl Router {
    /// Create a router dispatching through the given producer.
    pub fn new(producer: Producer) -> Self {
        Self { producer }
    }

    /// The static routing table. Pure: no IO, no state, fully unit-testable.
    pub fn routes(event: &DomainEvent) -> FanOut {
        let mut targets = FanOut::new();
        match event {
            DomainEvent::ThreadPublished {
                thread,
                toxicity_flagged,
            } => {
                targets.push(erased(ThreadNotificationJobData {
                    thread: thread.clone(),
                }));
                if *toxicity_flagged {
                    targets.push(erased(AdminToxicThreadJobData {
                        thread: thread.clone(),
                    }));
                }
            }
            DomainEvent::ThreadEdited { .. } => {}
            DomainEvent::ThreadSeen {
                thread_id,
                user_id,
                timestamp,
            } => {
                targets.push(erased(UserThreadLastSeenJobData {
                    thread_id: thread_id.clone(),
                    user_id: user_id.clone(),
                    timestamp: *timestamp,
                }));
            }
            DomainEvent::MessagePosted {
                message,
                toxicity_flagged,
            } => {
                targets.push(erased(MessageNotificationJobData {
                    message: message.clone(),
                }));
                if *toxicity_flagged {
                    targets.push(erased(AdminToxicMessageJobData {
                        message: message.clone(),
                    }));
                }
            }
            DomainEvent::DirectMessagePosted {
                message,
                recipient_id,
            } => {
                targets.push(erased(DirectMessageNotificationJobData {
                    message: message.clone(),
                    user_id: recipient_id.clone(),
                }));
            }
            DomainEvent::ReactionAdded { reaction, user_id } => {
                targets.push(erased(ReactionNotificationJobData {
                    reaction: reaction.clone(),
                    user_id: user_id.clone(),
                }));
            }
            DomainEvent::ChannelCreated { channel, user_id } => {
                targets.push(erased(ChannelNotificationJobData {
                    channel: channel.clone(),
                    user_id: user_id.clone(),
                }));
            }
            DomainEvent::PrivateChannelRequested { channel, user_id } => {
                targets.push(erased(PrivateChannelRequestJobData {
                    user_id: user_id.clone(),
                    channel: channel.clone(),
                }));
            }
            DomainEvent::PrivateChannelInviteSent {
                recipient,
                channel_id,
                sender_id,
                custom_message,
            } => {
                targets.push(erased(PrivateChannelInviteNotificationJobData {
                    recipient: recipient.clone(),
                    channel_id: channel_id.clone(),
                    sender_id: sender_id.clone(),
                    custom_message: custom_message.clone(),
                }));
            }
            DomainEvent::CommunityInviteSent {
                recipient,
                community_id,
                sender_id,
                custom_message,
            } => {
                targets.push(erased(CommunityInviteNotificationJobData {
                    recipient: recipient.clone(),
                    community_id: community_id.clone(),
                    sender_id: sender_id.clone(),
                    custom_message: custom_message.clone(),
                }));
            }
            DomainEvent::UserJoinedCommunity {
                community_id,
                user_id,
            } => {
                targets.push(erased(CommunityNotificationJobData {
                    community_id: community_id.clone(),
                    user_id: user_id.clone(),
                }));
            }
            DomainEvent::UserCreated { user } => {
                targets.push(erased(NewUserWelcomeEmailJobData { user: user.clone() }));
            }
            DomainEvent::EmailAdded { email, user_id } => {
                targets.push(erased(EmailValidationEmailJobData {
                    email: email.clone(),
                    user_id: user_id.clone(),
                }));
            }
            DomainEvent::AdministratorEmailAdded {
                email,
                user_id,
                community_id,
                community,
            } => {
                targets.push(erased(AdministratorEmailValidationEmailJobData {
                    email: email.clone(),
                    user_id: user_id.clone(),
                    community_id: community_id.clone(),
                    community: community.clone(),
                }));
            }
            DomainEvent::CommunityCreated { creator, community } => {
                targets.push(erased(NewCommunityWelcomeEmailJobData {
                    user: creator.clone(),
                    community: community.clone(),
                }));
                targets.push(erased(AdminCommunityCreatedEmailJobData {
                    user: creator.clone(),
                    community: community.clone(),
                }));
                targets.push(erased(CommunityBillingCreatedJobData {
                    community_id: community.id.clone(),
                }));
            }
            DomainEvent::CommunityChanged {
                community_id,
                change,
            } => {
                let community_id = community_id.clone();
                targets.push(match change {
                    CommunityChange::AdministratorEmailChanged => {
                        erased(AdministratorEmailChangedJobData { community_id })
                    }
                    CommunityChange::AnalyticsAdded => {
                        erased(AnalyticsAddedJobData { community_id })
                    }
                    CommunityChange::AnalyticsRemoved => {
                        erased(AnalyticsRemovedJobData { community_id })
                    }
                    CommunityChange::Deleted => {
                        erased(CommunityBillingDeletedJobData { community_id })
                    }
                    CommunityChange::Edited => {
                        erased(CommunityBillingEditedJobData { community_id })
                    }
                    CommunityChange::ModeratorAdded => {
                        erased(ModeratorSeatAddedJobData { community_id })
                    }
                    CommunityChange::ModeratorRemoved => {
                        erased(ModeratorSeatRemovedJobData { community_id })
                    }
                    CommunityChange::PrioritySupportAdded => {
                        erased(PrioritySupportAddedJobData { community_id })
                    }
                    CommunityChange::PrioritySupportRemoved => {
                        erased(PrioritySupportRemovedJobData { community_id })
                    }
                    CommunityChange::PrivateChannelAdded => {
                        erased(PrivateChannelAddedJobData { community_id })
                    }
                    CommunityChange::PrivateChannelRemoved => {
                        erased(PrivateChannelRemovedJobData { community_id })
                    }
                });
            }
            DomainEvent::ProInvoicePaid { invoice } => {
                targets.push(erased(ProInvoicePaidJobData {
                    invoice: invoice.clone(),
                }));
            }
            DomainEvent::CommunityInvoicePaid { invoice } => {
                targets.push(erased(CommunityInvoicePaidJobData {
                    invoice: invoice.clone(),
                }));
            }
            DomainEvent::ReputationChanged {
                user_id,
                event,
                entity_id,
            } => {
                targets.push(erased(ReputationEventJobData {
                    user_id: user_id.clone(),
                    event: event.clone(),
                    entity_id: entity_id.clone(),
                }));
            }
            DomainEvent::StripeWebhookReceived { record } => {
                targets.push(match record {
                    StripeRecord::Charge(record) => erased(ChargeWebhookJobData {
                        record: record.clone(),
                    }),
                    StripeRecord::Customer(record) => erased(CustomerWebhookJobData {
                        record: record.clone(),
                    }),
                    StripeRecord::Source(record) => erased(SourceWebhookJobData {
                        record: record.clone(),
                    }),
                    StripeRecord::Invoice(record) => erased(InvoiceWebhookJobData {
                        record: record.clone(),
                    }),
                    StripeRecord::Subscription(record) => erased(SubscriptionWebhookJobData {
                        record: record.clone(),
                    }),
                    StripeRecord::Discount(record) => erased(DiscountWebhookJobData {
                        record: record.clone(),
                    }),
                });
            }
            DomainEvent::SlackImportFinished {
                importer,
                community,
                invited_count,
                team_name,
            } => {
                targets.push(erased(AdminSlackImportJobData {
                    importer: importer.clone(),
                    community: community.clone(),
                    invited_count: *invited_count,
                    team_name: team_name.clone(),
                }));
            }
        }
        targets
    }

    /// Project the event and enqueue one job per mapped queue.
    ///
    /// Suspends only for enqueue acknowledgments; nothing about processing
    /// is awaited. Returns the handles in table order.
    pub async fn dispatch(&self, event: DomainEvent) -> Result<Vec<JobHandle>, EnqueueError> {
        let targets = Self::routes(&event);
        if targets.is_empty() {
            debug!("event has no routing entry, dispatch is a no-op");
            return Ok(Vec::new());
        }

        let mut handles = Vec::with_capacity(targets.len());
        for payload in targets {
            handles.push(self.producer.enqueue_erased(payload).await?);
        }
        Ok(handles)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;
    use serde_json::json;

    use super::*;
    use crate::queue::QueueName;
    use crate::record::ChargeRecord;
    use crate::registry::QueueRegistry;
    use crate::testing::RecordingBackend;

    fn sample_thread() -> ThreadRecord {
        ThreadRecord {
            id: "t1".into(),
            creator_id: "u1".into(),
            channel_id: "c1".into(),
            community_id: "co1".into(),
            title: "hello".into(),
            body: None,
            created_at: Utc::now(),
        }
    }

    fn sample_user() -> UserRecord {
        UserRecord {
            id: "u1".into(),
            name: "Ada".into(),
            username: Some("ada".into()),
            email: Some("ada@example.com".into()),
            created_at: Utc::now(),
        }
    }

    fn sample_community() -> CommunityRecord {
        CommunityRecord {
            id: "co1".into(),
            name: "Lovelace".into(),
            slug: "lovelace".into(),
            created_at: Utc::now(),
        }
    }

    fn target_queues(event: &DomainEvent) -> Vec<QueueName> {
        Router::routes(event).iter().map(|p| p.queue()).collect()
    }

    #[test]
    fn test_reaction_added_routes_to_reaction_queue() {
        let event = DomainEvent::ReactionAdded {
            reaction: ReactionRecord {
                id: "r1".into(),
                message_id: "m1".into(),
                user_id: "u2".into(),
                kind: "like".into(),
                created_at: Utc::now(),
            },
            user_id: "u1".into(),
        };
        assert_eq!(
            target_queues(&event),
            vec![QueueName::SendReactionNotification]
        );
    }

    #[test]
    fn test_thread_published_fans_out_when_flagged() {
        let clean = DomainEvent::ThreadPublished {
            thread: sample_thread(),
            toxicity_flagged: false,
        };
        assert_eq!(
            target_queues(&clean),
            vec![QueueName::SendThreadNotification]
        );

        let flagged = DomainEvent::ThreadPublished {
            thread: sample_thread(),
            toxicity_flagged: true,
        };
        assert_eq!(
            target_queues(&flagged),
            vec![
                QueueName::SendThreadNotification,
                QueueName::AdminProcessToxicThread,
            ]
        );
    }

    #[test]
    fn test_thread_edited_is_unmapped() {
        let event = DomainEvent::ThreadEdited {
            thread: sample_thread(),
        };
        assert!(Router::routes(&event).is_empty());
    }

    #[test]
    fn test_community_created_three_way_fan_out() {
        let event = DomainEvent::CommunityCreated {
            creator: sample_user(),
            community: sample_community(),
        };
        assert_eq!(
            target_queues(&event),
            vec![
                QueueName::SendNewCommunityWelcomeEmail,
                QueueName::AdminSendCommunityCreatedEmail,
                QueueName::StripeCommunityCreated,
            ]
        );
    }

    #[test]
    fn test_stripe_webhook_routes_by_subtype() {
        let charge = DomainEvent::StripeWebhookReceived {
            record: StripeRecord::Charge(ChargeRecord {
                id: "ch_1".into(),
                customer: "cus_1".into(),
                amount: 500,
                currency: "usd".into(),
                paid: true,
            }),
        };
        assert_eq!(
            target_queues(&charge),
            vec![QueueName::StripeChargeWebhookEvent]
        );

        let discount = DomainEvent::StripeWebhookReceived {
            record: StripeRecord::Discount(crate::record::DiscountRecord {
                customer: "cus_1".into(),
                coupon: "SAVE10".into(),
            }),
        };
        assert_eq!(
            target_queues(&discount),
            vec![QueueName::StripeDiscountWebhookEvent]
        );
    }

    #[test]
    fn test_community_change_mapping_is_total() {
        let cases = [
            (
                CommunityChange::AdministratorEmailChanged,
                QueueName::StripeCommunityAdministratorEmailChanged,
            ),
            (CommunityChange::AnalyticsAdded, QueueName::StripeCommunityAnalyticsAdded),
            (CommunityChange::AnalyticsRemoved, QueueName::StripeCommunityAnalyticsRemoved),
            (CommunityChange::Deleted, QueueName::StripeCommunityDeleted),
            (CommunityChange::Edited, QueueName::StripeCommunityEdited),
            (CommunityChange::ModeratorAdded, QueueName::StripeCommunityModeratorAdded),
            (CommunityChange::ModeratorRemoved, QueueName::StripeCommunityModeratorRemoved),
            (
                CommunityChange::PrioritySupportAdded,
                QueueName::StripeCommunityPrioritySupportAdded,
            ),
            (
                CommunityChange::PrioritySupportRemoved,
                QueueName::StripeCommunityPrioritySupportRemoved,
            ),
            (
                CommunityChange::PrivateChannelAdded,
                QueueName::StripeCommunityPrivateChannelAdded,
            ),
            (
                CommunityChange::PrivateChannelRemoved,
                QueueName::StripeCommunityPrivateChannelRemoved,
            ),
        ];
        for (change, queue) in cases {
            let event = DomainEvent::CommunityChanged {
                community_id: "co1".into(),
                change,
            };
            assert_eq!(target_queues(&event), vec![queue], "change {change:?}");
        }
    }

    #[tokio::test]
    async fn test_dispatch_projects_reaction_payload() {
        let backend = Arc::new(RecordingBackend::new());
        let registry = Arc::new(
            QueueRegistry::builder(backend.clone())
                .register_all()
                .unwrap()
                .build(),
        );
        let router = Router::new(Producer::new(registry));

        let created_at = Utc::now();
        let handles = router
            .dispatch(DomainEvent::ReactionAdded {
                reaction: ReactionRecord {
                    id: "r1".into(),
                    message_id: "m1".into(),
                    user_id: "u2".into(),
                    kind: "like".into(),
                    created_at,
                },
                user_id: "u1".into(),
            })
            .await
            .unwrap();

        assert_eq!(handles.len(), 1);
        assert_eq!(handles[0].queue, QueueName::SendReactionNotification);

        let submissions = backend.submissions_to(QueueName::SendReactionNotification);
        assert_eq!(submissions.len(), 1);
        assert_eq!(backend.submission_count(), 1);
        assert_eq!(
            submissions[0].payload,
            json!({
                "reaction": {
                    "id": "r1",
                    "messageId": "m1",
                    "userId": "u2",
                    "kind": "like",
                    "createdAt": created_at,
                },
                "userId": "u1",
            })
        );
    }

    #[tokio::test]
    async fn test_dispatch_fan_out_enqueues_once_per_queue() {
        let backend = Arc::new(RecordingBackend::new());
        let registry = Arc::new(
            QueueRegistry::builder(backend.clone())
                .register_all()
                .unwrap()
                .build(),
        );
        let router = Router::new(Producer::new(registry));

        let handles = router
            .dispatch(DomainEvent::CommunityCreated {
                creator: sample_user(),
                community: sample_community(),
            })
            .await
            .unwrap();

        assert_eq!(handles.len(), 3);
        backend.assert_submission_count(QueueName::SendNewCommunityWelcomeEmail, 1);
        backend.assert_submission_count(QueueName::AdminSendCommunityCreatedEmail, 1);
        backend.assert_submission_count(QueueName::StripeCommunityCreated, 1);
        assert_eq!(backend.submission_count(), 3);
    }

    #[tokio::test]
    async fn test_dispatch_unmapped_event_is_noop() {
        let backend = Arc::new(RecordingBackend::new());
        let registry = Arc::new(
            QueueRegistry::builder(backend.clone())
                .register_all()
                .unwrap()
                .build(),
        );
        let router = Router::new(Producer::new(registry));

        let handles = router
            .dispatch(DomainEvent::ThreadEdited {
                thread: sample_thread(),
            })
            .await
            .unwrap();

        assert!(handles.is_empty());
        backend.assert_no_submissions();
    }
}
