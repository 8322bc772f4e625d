//! Unsigned SPL token transfer transactions in Solana's legacy wire format.
//!
//! We build the bytes by hand; no `solana-sdk`. The layout:
//!
//! ```text
//! Transaction:
//!   num_signatures          compact-u16
//!   signatures              64 bytes * num_signatures   (zero-filled here)
//!   message:
//!     num_required_sigs     u8
//!     num_readonly_signed   u8
//!     num_readonly_unsigned u8
//!     num_accounts          compact-u16
//!     account_keys          32 bytes * num_accounts
//!     recent_blockhash      32 bytes
//!     num_instructions      compact-u16
//!     instructions[]        (see below)
//!
//! Instruction:
//!   program_id_index        u8
//!   num_accounts            compact-u16
//!   account_indices         u8 * num_accounts
//!   data_len                compact-u16
//!   data                    u8 * data_len
//! ```
//!
//! A transfer message always carries the same four accounts, and every
//! instruction refers to them by index:
//!
//! ```text
//!   0  fee payer / token owner   signer, writable
//!   1  source token account      writable
//!   2  destination token account writable
//!   3  token program             read-only
//! ```

use log::{debug, warn};

use crate::address::Pubkey;
use crate::compact_u16::{decode_compact_u16, encode_len, write_len};
use crate::config::TransferConfig;
use crate::error::SolError;
use crate::pda_cache::DerivationCache;
use crate::token::{derive_token_account, transfer_data};

/// Length of an Ed25519 signature slot.
pub const SIGNATURE_LEN: usize = 64;

/// Largest transaction the cluster accepts in one packet.
pub const MAX_TRANSACTION_SIZE: usize = 1232;

const FEE_PAYER_INDEX: u8 = 0;
const SOURCE_INDEX: u8 = 1;
const DESTINATION_INDEX: u8 = 2;
const TOKEN_PROGRAM_INDEX: u8 = 3;

// ---------------------------------------------------------------------------
// Data structures
// ---------------------------------------------------------------------------

/// The three header bytes of a legacy message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageHeader {
    /// Number of required signatures (first N accounts are signers).
    pub num_required_signatures: u8,
    /// How many of the signing accounts are read-only.
    pub num_readonly_signed: u8,
    /// How many of the non-signing accounts are read-only.
    pub num_readonly_unsigned: u8,
}

/// An instruction whose accounts are indices into the message's
/// `account_keys`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledInstruction {
    pub program_id_index: u8,
    pub account_indices: Vec<u8>,
    pub data: Vec<u8>,
}

/// A legacy message: the bytes an external signer signs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsignedMessage {
    pub header: MessageHeader,
    pub account_keys: Vec<Pubkey>,
    pub recent_blockhash: [u8; 32],
    pub instructions: Vec<CompiledInstruction>,
}

/// A message plus one signature slot per required signer.
///
/// Slots produced by [`TransferBuilder`] are all zeros; the wallet fills
/// them in (see [`crate::signer::sign_unsigned_transaction`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsignedTransaction {
    pub signatures: Vec<[u8; SIGNATURE_LEN]>,
    pub message: UnsignedMessage,
}

// ---------------------------------------------------------------------------
// Serialization
// ---------------------------------------------------------------------------

impl UnsignedMessage {
    /// Serialize the message. Every count is compact-u16 prefixed.
    pub fn serialize(&self) -> Result<Vec<u8>, SolError> {
        let mut buf = Vec::with_capacity(256);

        buf.push(self.header.num_required_signatures);
        buf.push(self.header.num_readonly_signed);
        buf.push(self.header.num_readonly_unsigned);

        write_len(&mut buf, self.account_keys.len())?;
        for key in &self.account_keys {
            buf.extend_from_slice(key.as_bytes());
        }

        buf.extend_from_slice(&self.recent_blockhash);

        write_len(&mut buf, self.instructions.len())?;
        for ix in &self.instructions {
            buf.push(ix.program_id_index);

            write_len(&mut buf, ix.account_indices.len())?;
            buf.extend_from_slice(&ix.account_indices);

            write_len(&mut buf, ix.data.len())?;
            buf.extend_from_slice(&ix.data);
        }

        Ok(buf)
    }

    fn read(reader: &mut Reader<'_>) -> Result<Self, SolError> {
        let header = MessageHeader {
            num_required_signatures: reader.u8("message header")?,
            num_readonly_signed: reader.u8("message header")?,
            num_readonly_unsigned: reader.u8("message header")?,
        };

        let num_accounts = reader.len()?;
        let mut account_keys = Vec::with_capacity(num_accounts);
        for _ in 0..num_accounts {
            account_keys.push(Pubkey::new(reader.array32("account key")?));
        }

        if usize::from(header.num_required_signatures) > account_keys.len() {
            return Err(SolError::Serialization(format!(
                "header requires {} signers but only {} accounts are listed",
                header.num_required_signatures,
                account_keys.len()
            )));
        }

        let recent_blockhash = reader.array32("recent blockhash")?;

        let num_instructions = reader.len()?;
        let mut instructions = Vec::with_capacity(num_instructions);
        for _ in 0..num_instructions {
            let program_id_index = reader.u8("program id index")?;
            let num_indices = reader.len()?;
            let account_indices = reader.take(num_indices, "account indices")?.to_vec();
            let data_len = reader.len()?;
            let data = reader.take(data_len, "instruction data")?.to_vec();

            let out_of_range = std::iter::once(&program_id_index)
                .chain(&account_indices)
                .find(|&&i| usize::from(i) >= account_keys.len());
            if let Some(index) = out_of_range {
                return Err(SolError::Serialization(format!(
                    "account index {index} out of range for {} keys",
                    account_keys.len()
                )));
            }

            instructions.push(CompiledInstruction {
                program_id_index,
                account_indices,
                data,
            });
        }

        Ok(Self {
            header,
            account_keys,
            recent_blockhash,
            instructions,
        })
    }
}

impl UnsignedTransaction {
    /// Wrap `message` with one zero-filled slot per required signature.
    pub fn new(message: UnsignedMessage) -> Self {
        let slots = usize::from(message.header.num_required_signatures);
        Self {
            signatures: vec![[0u8; SIGNATURE_LEN]; slots],
            message,
        }
    }

    /// Serialize into wire format: signature count, slots, message.
    pub fn serialize(&self) -> Result<Vec<u8>, SolError> {
        let message = self.message.serialize()?;

        let mut wire = Vec::with_capacity(3 + self.signatures.len() * SIGNATURE_LEN + message.len());
        write_len(&mut wire, self.signatures.len())?;
        for signature in &self.signatures {
            wire.extend_from_slice(signature);
        }
        wire.extend_from_slice(&message);

        Ok(wire)
    }

    /// Decode a legacy wire-format transaction.
    ///
    /// The slot count must match the header's required signatures and the
    /// input must be consumed exactly; truncation and trailing bytes are
    /// both `Serialization` errors.
    pub fn parse(bytes: &[u8]) -> Result<Self, SolError> {
        let mut reader = Reader::new(bytes);

        let num_signatures = reader.len()?;
        let mut signatures = Vec::with_capacity(num_signatures);
        for _ in 0..num_signatures {
            let slot = reader.take(SIGNATURE_LEN, "signature")?;
            let mut signature = [0u8; SIGNATURE_LEN];
            signature.copy_from_slice(slot);
            signatures.push(signature);
        }

        let message = UnsignedMessage::read(&mut reader)?;
        reader.finish()?;

        if signatures.len() != usize::from(message.header.num_required_signatures) {
            return Err(SolError::Serialization(format!(
                "{} signature slots for {} required signers",
                signatures.len(),
                message.header.num_required_signatures
            )));
        }

        Ok(Self {
            signatures,
            message,
        })
    }

    /// Byte offset where the message starts in the serialized form.
    pub(crate) fn message_offset(&self) -> Result<usize, SolError> {
        Ok(encode_len(self.signatures.len())?.len() + self.signatures.len() * SIGNATURE_LEN)
    }
}

/// Cursor over wire bytes with bounds-checked reads.
struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn take(&mut self, n: usize, what: &str) -> Result<&'a [u8], SolError> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|&end| end <= self.data.len())
            .ok_or_else(|| SolError::Serialization(format!("transaction truncated in {what}")))?;
        let slice = &self.data[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn u8(&mut self, what: &str) -> Result<u8, SolError> {
        Ok(self.take(1, what)?[0])
    }

    fn array32(&mut self, what: &str) -> Result<[u8; 32], SolError> {
        let mut out = [0u8; 32];
        out.copy_from_slice(self.take(32, what)?);
        Ok(out)
    }

    fn len(&mut self) -> Result<usize, SolError> {
        let (value, used) = decode_compact_u16(&self.data[self.pos..])?;
        self.pos += used;
        Ok(usize::from(value))
    }

    fn finish(&self) -> Result<(), SolError> {
        if self.pos != self.data.len() {
            return Err(SolError::Serialization(format!(
                "{} trailing bytes after message",
                self.data.len() - self.pos
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Transfer building
// ---------------------------------------------------------------------------

/// Builds unsigned token transfer transactions for one configured mint.
///
/// A build may carry any positive number of transfers; they share the
/// fee payer as authority and the same counterparty, so the two token
/// accounts are resolved once per message.
pub struct TransferBuilder<'a> {
    cache: &'a DerivationCache,
    config: TransferConfig,
}

impl<'a> TransferBuilder<'a> {
    pub fn new(cache: &'a DerivationCache, config: TransferConfig) -> Self {
        Self { cache, config }
    }

    pub fn config(&self) -> &TransferConfig {
        &self.config
    }

    /// Assemble the unsigned message moving each of `amounts` from the fee
    /// payer's token account to the counterparty's.
    pub fn build_message(
        &self,
        fee_payer: &[u8],
        counterparty: &[u8],
        amounts: &[u64],
        recent_blockhash: &[u8],
    ) -> Result<UnsignedMessage, SolError> {
        let fee_payer = expect_32(fee_payer, "fee payer")?;
        let counterparty = expect_32(counterparty, "counterparty")?;
        let recent_blockhash = expect_32(recent_blockhash, "recent blockhash")?;
        validate_amounts(amounts)?;

        let TransferConfig {
            mint,
            token_program,
        } = self.config;
        let fee_payer = Pubkey::new(fee_payer);
        let counterparty = Pubkey::new(counterparty);

        let source = derive_token_account(self.cache, &fee_payer, &mint, &token_program)?;
        let destination = derive_token_account(self.cache, &counterparty, &mint, &token_program)?;

        let instructions = amounts
            .iter()
            .map(|&amount| CompiledInstruction {
                program_id_index: TOKEN_PROGRAM_INDEX,
                account_indices: vec![SOURCE_INDEX, DESTINATION_INDEX, FEE_PAYER_INDEX],
                data: transfer_data(amount),
            })
            .collect();

        Ok(UnsignedMessage {
            header: MessageHeader {
                num_required_signatures: 1,
                num_readonly_signed: 0,
                num_readonly_unsigned: 1,
            },
            account_keys: vec![
                fee_payer,
                source.address,
                destination.address,
                token_program,
            ],
            recent_blockhash,
            instructions,
        })
    }

    /// Build the full unsigned transaction bytes, with a zero-filled slot
    /// for the fee payer's signature.
    pub fn build(
        &self,
        fee_payer: &[u8],
        counterparty: &[u8],
        amounts: &[u64],
        recent_blockhash: &[u8],
    ) -> Result<Vec<u8>, SolError> {
        let message = self.build_message(fee_payer, counterparty, amounts, recent_blockhash)?;
        let wire = UnsignedTransaction::new(message).serialize()?;

        if wire.len() > MAX_TRANSACTION_SIZE {
            warn!(
                "transfer batch of {} is {} bytes, above the {MAX_TRANSACTION_SIZE}-byte packet limit",
                amounts.len(),
                wire.len()
            );
        }
        debug!(
            "built {} transfer instruction(s), {} bytes",
            amounts.len(),
            wire.len()
        );

        Ok(wire)
    }

    /// [`build`](Self::build) with Base58 text for keys and blockhash, as
    /// they arrive from the API.
    pub fn build_from_base58(
        &self,
        fee_payer: &str,
        counterparty: &str,
        amounts: &[u64],
        recent_blockhash: &str,
    ) -> Result<Vec<u8>, SolError> {
        self.build(
            &crate::base58::decode(fee_payer)?,
            &crate::base58::decode(counterparty)?,
            amounts,
            &crate::base58::decode(recent_blockhash)?,
        )
    }
}

fn expect_32(bytes: &[u8], what: &str) -> Result<[u8; 32], SolError> {
    bytes.try_into().map_err(|_| {
        SolError::MalformedInput(format!("{what} must be 32 bytes, got {}", bytes.len()))
    })
}

fn validate_amounts(amounts: &[u64]) -> Result<(), SolError> {
    if amounts.is_empty() {
        return Err(SolError::MalformedInput(
            "at least one transfer amount is required".into(),
        ));
    }
    if amounts.len() > usize::from(u16::MAX) {
        return Err(SolError::MalformedInput(format!(
            "{} transfers do not fit in one message",
            amounts.len()
        )));
    }
    if let Some(i) = amounts.iter().position(|&a| a == 0) {
        return Err(SolError::MalformedInput(format!(
            "transfer amount {i} must be > 0"
        )));
    }
    Ok(())
}
