/// The text a wallet signs to answer a challenge.
///
/// Built once at issue time and stored verbatim; verification always uses
/// the stored copy, never a rebuilt one.
pub fn challenge_message(purpose: &str, wallet_address: &str, nonce: &str) -> String {
    format!("{purpose}\n\nWallet: {wallet_address}\nNonce: {nonce}")
}
