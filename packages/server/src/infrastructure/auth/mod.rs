//! HMAC トークンによる TokenVerifier 実装
//!
//! ## トークン形式
//!
//! `v1.<payload_b64>.<sig_b64>`
//!
//! - `payload_b64`: URL-safe base64（パディングなし）でエンコードした
//!   JSON クレーム `{"sub": "<user_id>", "exp": <unix_secs>}`
//! - `sig_b64`: `payload_b64` に対する HMAC-SHA256 署名
//!
//! 署名の比較は定数時間で行います。

use std::sync::Arc;

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use tamariba_shared::time::{Clock, SystemClock};

use crate::domain::{AuthError, TokenVerifier, UserId};

/// トークンに埋め込まれるクレーム
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Claims {
    /// ユーザー ID
    sub: String,
    /// 有効期限（Unix 秒）
    exp: i64,
}

/// HMAC-SHA256 トークンの検証器
pub struct HmacTokenVerifier {
    /// 署名鍵
    secret: String,
    /// Clock（時刻の抽象化）
    clock: Arc<dyn Clock>,
}

impl HmacTokenVerifier {
    /// システムクロックを使う HmacTokenVerifier を作成
    pub fn new(secret: String) -> Self {
        Self::with_clock(secret, Arc::new(SystemClock))
    }

    /// Clock を指定して作成（テスト用）
    pub fn with_clock(secret: String, clock: Arc<dyn Clock>) -> Self {
        Self { secret, clock }
    }
}

#[async_trait]
impl TokenVerifier for HmacTokenVerifier {
    async fn verify(&self, token: &str) -> Result<UserId, AuthError> {
        let parts = token.split('.').collect::<Vec<_>>();
        if parts.len() != 3 || parts[0] != "v1" {
            return Err(AuthError::InvalidToken);
        }

        let payload_b64 = parts[1];
        let sig_b64 = parts[2];

        let payload = URL_SAFE_NO_PAD
            .decode(payload_b64)
            .map_err(|_| AuthError::InvalidToken)?;
        let expected_sig = sign(payload_b64.as_bytes(), self.secret.as_bytes());
        let provided_sig = URL_SAFE_NO_PAD
            .decode(sig_b64)
            .map_err(|_| AuthError::InvalidToken)?;

        if !constant_time_eq(&expected_sig, &provided_sig) {
            return Err(AuthError::InvalidToken);
        }

        let claims: Claims =
            serde_json::from_slice(&payload).map_err(|_| AuthError::InvalidToken)?;
        let now_secs = self.clock.now_millis() / 1000;
        if claims.exp <= now_secs {
            return Err(AuthError::TokenExpired);
        }

        UserId::new(claims.sub).map_err(|_| AuthError::InvalidToken)
    }
}

/// 開発・運用補助用のトークン発行
///
/// サーバーバイナリの `--mint-token` から利用されます。
pub fn mint_token(user_id: &str, secret: &str, ttl_secs: i64) -> String {
    let now_secs = SystemClock.now_millis() / 1000;
    let claims = Claims {
        sub: user_id.to_string(),
        exp: now_secs + ttl_secs,
    };
    // Claims は Serialize 可能な単純構造体のためシリアライズは失敗しない
    let payload = serde_json::to_vec(&claims).unwrap();
    let payload_b64 = URL_SAFE_NO_PAD.encode(payload);
    let sig = sign(payload_b64.as_bytes(), secret.as_bytes());
    let sig_b64 = URL_SAFE_NO_PAD.encode(sig);
    format!("v1.{payload_b64}.{sig_b64}")
}

fn sign(payload_b64: &[u8], secret: &[u8]) -> Vec<u8> {
    // HMAC-SHA256 は任意長の鍵を受け付けるため new_from_slice は失敗しない
    let mut mac = Hmac::<Sha256>::new_from_slice(secret).unwrap();
    mac.update(payload_b64);
    mac.finalize().into_bytes().to_vec()
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }

    diff == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use tamariba_shared::time::FixedClock;

    const SECRET: &str = "test-secret";

    #[tokio::test]
    async fn test_verify_round_trip() {
        // テスト項目: 発行したトークンが検証を通り、sub が返る
        // given (前提条件):
        let verifier = HmacTokenVerifier::new(SECRET.to_string());
        let token = mint_token("u-alice", SECRET, 3600);

        // when (操作):
        let result = verifier.verify(&token).await;

        // then (期待する結果):
        assert_eq!(result.unwrap().as_str(), "u-alice");
    }

    #[tokio::test]
    async fn test_verify_rejects_wrong_secret() {
        // テスト項目: 異なる鍵で署名されたトークンは拒否される
        // given (前提条件):
        let verifier = HmacTokenVerifier::new(SECRET.to_string());
        let token = mint_token("u-alice", "other-secret", 3600);

        // when (操作):
        let result = verifier.verify(&token).await;

        // then (期待する結果):
        assert_eq!(result.unwrap_err(), AuthError::InvalidToken);
    }

    #[tokio::test]
    async fn test_verify_rejects_expired_token() {
        // テスト項目: 期限切れのトークンは TokenExpired で拒否される
        // given (前提条件): exp より未来の固定時刻で検証
        let token = mint_token("u-alice", SECRET, 10);
        let far_future_millis = (SystemClock.now_millis() / 1000 + 3600) * 1000;
        let verifier = HmacTokenVerifier::with_clock(
            SECRET.to_string(),
            std::sync::Arc::new(FixedClock::new(far_future_millis)),
        );

        // when (操作):
        let result = verifier.verify(&token).await;

        // then (期待する結果):
        assert_eq!(result.unwrap_err(), AuthError::TokenExpired);
    }

    #[tokio::test]
    async fn test_verify_rejects_malformed_token() {
        // テスト項目: 形式が崩れたトークンは拒否される
        // given (前提条件):
        let verifier = HmacTokenVerifier::new(SECRET.to_string());

        // when / then:
        for token in ["", "v1", "v2.a.b", "v1.not-base64!!.sig", "plain-text"] {
            let result = verifier.verify(token).await;
            assert_eq!(result.unwrap_err(), AuthError::InvalidToken, "{token}");
        }
    }

    #[tokio::test]
    async fn test_verify_rejects_tampered_payload() {
        // テスト項目: ペイロード改ざんは署名不一致で拒否される
        // given (前提条件): sub を差し替えたペイロード
        let verifier = HmacTokenVerifier::new(SECRET.to_string());
        let token = mint_token("u-alice", SECRET, 3600);
        let parts = token.split('.').collect::<Vec<_>>();
        let forged_payload = URL_SAFE_NO_PAD.encode(br#"{"sub":"u-mallory","exp":99999999999}"#);
        let forged = format!("v1.{}.{}", forged_payload, parts[2]);

        // when (操作):
        let result = verifier.verify(&forged).await;

        // then (期待する結果):
        assert_eq!(result.unwrap_err(), AuthError::InvalidToken);
    }
}
