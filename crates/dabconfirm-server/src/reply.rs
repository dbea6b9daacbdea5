use dabconfirm_store::{Confirmation, ConfirmationStore};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// The `(dab_id, valid)` pair acknowledgments are built from. Serializes
/// as a two-element JSON array.
pub type AckInfo = (u64, bool);

/// How an acknowledgment correlates the confirmed message against the
/// rest of the stored history for the same sender.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ReplyPolicy {
    /// One secondary list covering every other confirmation for the
    /// sender, regardless of technology.
    #[default]
    CrossTechnology,
    /// Two secondary lists: confirmations that arrived over the reference
    /// technology, and invalidated confirmations from any other
    /// technology.
    TechnologySplit { reference_technology: String },
}

/// Acknowledgment for a confirmation received over any technology.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossTechnologyAck {
    /// `(dab_id, valid)` of the confirmation being acknowledged.
    pub ack_information: AckInfo,
    /// Every other stored confirmation for the same sender.
    pub different_ack_information: Vec<AckInfo>,
}

/// Acknowledgment split by reference technology.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnologySplitAck {
    /// `(dab_id, valid)` of the confirmation being acknowledged.
    pub ack_information: AckInfo,
    /// Other confirmations for the sender that arrived over the
    /// reference technology.
    pub technology_ack_information: Vec<AckInfo>,
    /// Invalidated confirmations for the sender from other technologies.
    pub invalid_ack_information: Vec<AckInfo>,
}

/// The reply payload sent after every handled confirmation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AckReply {
    CrossTechnology(CrossTechnologyAck),
    TechnologySplit(TechnologySplitAck),
}

impl AckReply {
    /// The `(dab_id, valid)` pair of the acknowledged confirmation.
    pub fn ack_information(&self) -> AckInfo {
        match self {
            AckReply::CrossTechnology(ack) => ack.ack_information,
            AckReply::TechnologySplit(ack) => ack.ack_information,
        }
    }
}

/// Builds the acknowledgment for `confirmed_id` against the store
/// contents at call time.
///
/// `sender` is taken from the frame that was just handled, so a repeated
/// `dab_id` is correlated for the device that is asking now. The
/// acknowledged pair itself always reflects the stored record; the
/// secondary lists never include `confirmed_id`.
pub fn build_reply(
    store: &ConfirmationStore,
    confirmed_id: u64,
    sender: u64,
    policy: &ReplyPolicy,
) -> Result<AckReply> {
    let ack_information = store.find_by_id(confirmed_id)?.reply_info();

    let reply = match policy {
        ReplyPolicy::CrossTechnology => AckReply::CrossTechnology(CrossTechnologyAck {
            ack_information,
            different_ack_information: ack_pairs(
                store.filter(|c| c.sender == sender && c.dab_id != confirmed_id),
            ),
        }),
        ReplyPolicy::TechnologySplit {
            reference_technology,
        } => AckReply::TechnologySplit(TechnologySplitAck {
            ack_information,
            technology_ack_information: ack_pairs(store.filter(|c| {
                c.sender == sender
                    && c.dab_id != confirmed_id
                    && c.technology == *reference_technology
            })),
            invalid_ack_information: ack_pairs(store.filter(|c| {
                c.sender == sender
                    && c.dab_id != confirmed_id
                    && c.technology != *reference_technology
                    && !c.valid
            })),
        }),
    };

    Ok(reply)
}

fn ack_pairs(confirmations: Vec<Confirmation>) -> Vec<AckInfo> {
    confirmations.iter().map(Confirmation::reply_info).collect()
}
