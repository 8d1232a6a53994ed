//! AES-256-CBC at-rest cipher for the cached token blob.
//!
//! The blob format is `<ivHex>:<ciphertextHex>` with a fresh random 16-byte
//! IV per encrypt call, so identical plaintexts never produce identical blobs.

use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::{rngs::OsRng, RngCore};

use crate::error::{Error, Result};

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

const IV_LEN: usize = 16;

pub fn encrypt(plaintext: &str, key: &[u8; 32]) -> String {
    let mut iv = [0u8; IV_LEN];
    OsRng.fill_bytes(&mut iv);

    let ciphertext =
        Aes256CbcEnc::new(key.into(), &iv.into()).encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes());

    format!("{}:{}", hex::encode(iv), hex::encode(ciphertext))
}

/// Any malformed blob, wrong key, or padding failure is a recoverable
/// `Cipher` error. Callers treat it identically to "no usable cached token".
pub fn decrypt(blob: &str, key: &[u8; 32]) -> Result<String> {
    let (iv_hex, ciphertext_hex) = blob
        .split_once(':')
        .ok_or_else(|| Error::cipher("blob is missing the iv delimiter"))?;

    let iv = hex::decode(iv_hex).map_err(|e| Error::cipher(format!("invalid iv hex: {e}")))?;
    let ciphertext =
        hex::decode(ciphertext_hex).map_err(|e| Error::cipher(format!("invalid ciphertext hex: {e}")))?;

    let decryptor = Aes256CbcDec::new_from_slices(key, &iv)
        .map_err(|e| Error::cipher(format!("invalid iv length: {e}")))?;

    let plaintext = decryptor
        .decrypt_padded_vec_mut::<Pkcs7>(&ciphertext)
        .map_err(|_| Error::cipher("decryption failed, wrong key or corrupted blob"))?;

    String::from_utf8(plaintext).map_err(|e| Error::cipher(format!("decrypted data is not utf-8: {e}")))
}
