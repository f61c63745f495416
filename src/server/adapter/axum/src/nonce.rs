/* src/server/adapter/axum/src/nonce.rs */

/// Fresh per-request CSP nonce: 16 random bytes, hex encoded.
pub fn generate_nonce() -> String {
  let bytes: [u8; 16] = rand::random();
  hex::encode(bytes)
}

/// `Content-Security-Policy` value allowing only same-origin scripts and the
/// inline bootstrap script carrying `nonce`.
pub fn content_security_policy(nonce: &str) -> String {
  format!("script-src 'nonce-{nonce}' 'self'")
}
