use sol_wire::DerivedAddress;

/// A program-derived address as handed to the app.
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct DerivedAccount {
    /// Base58 address
    pub address: String,
    pub bump: u8,
}

impl From<DerivedAddress> for DerivedAccount {
    fn from(derived: DerivedAddress) -> Self {
        Self {
            address: derived.address.to_base58(),
            bump: derived.bump,
        }
    }
}
