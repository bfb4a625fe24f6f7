use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

const SIGNATURE_PREFIX: &str = "sha256=";

/// Verifies an HMAC-SHA256 webhook signature over the raw request body.
///
/// With no secret configured every payload passes, signed or not; the vendor
/// integration runs unsigned in development. With a secret, the hex signature
/// (optionally `sha256=`-prefixed) must match exactly; comparison is
/// constant-time via `Mac::verify_slice`.
pub fn verify(secret: Option<&str>, payload: &[u8], provided: Option<&str>) -> bool {
	let Some(secret) = secret else {
		return true;
	};
	let Some(provided) = provided else {
		return false;
	};
	let encoded = provided.strip_prefix(SIGNATURE_PREFIX).unwrap_or(provided).trim();
	let Ok(expected) = hex::decode(encoded) else {
		return false;
	};
	let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
		return false;
	};

	mac.update(payload);

	mac.verify_slice(&expected).is_ok()
}

/// Hex HMAC-SHA256 digest of a payload, `sha256=`-prefixed. The counterpart
/// of [`verify`], used by tests and outbound tooling.
pub fn sign(secret: &str, payload: &[u8]) -> String {
	let mut mac =
		HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key size.");

	mac.update(payload);

	format!("{SIGNATURE_PREFIX}{}", hex::encode(mac.finalize().into_bytes()))
}
