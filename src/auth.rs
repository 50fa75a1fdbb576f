//! ログインゲート
//!
//! 設定にログイン情報がある場合のみ、照合処理の前に認証する。
//! パスワードは環境変数 `ITEMCODE_PASSWORD` を優先し、なければ対話入力。

use crate::config::AuthConfig;
use crate::error::{MatcherError, Result};
use sha2::{Digest, Sha256};

pub const PASSWORD_ENV: &str = "ITEMCODE_PASSWORD";

/// パスワードのSHA-256（hex）
pub fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

/// ユーザー名とパスワードを照合
pub fn verify(auth: &AuthConfig, username: &str, password: &str) -> bool {
    let expected = auth.password_sha256.to_lowercase();
    let actual = hash_password(password);

    // 長さが同じなら全バイトを比較する
    let digest_ok = expected.len() == actual.len()
        && expected
            .bytes()
            .zip(actual.bytes())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0;

    digest_ok && auth.username == username
}

/// 認証ゲート（ログイン情報が未設定なら常に通過）
pub fn login_gate(auth: Option<&AuthConfig>, user: Option<&str>) -> Result<()> {
    let Some(auth) = auth else {
        return Ok(());
    };

    let username = user.unwrap_or(&auth.username);
    let password = match std::env::var(PASSWORD_ENV) {
        Ok(password) => password,
        Err(_) => prompt_password(username)?,
    };

    if verify(auth, username, &password) {
        log::info!("ログイン成功: {}", username);
        Ok(())
    } else {
        Err(MatcherError::Authentication)
    }
}

fn prompt_password(username: &str) -> Result<String> {
    dialoguer::Password::new()
        .with_prompt(format!("{} のパスワード", username))
        .interact()
        .map_err(|_| MatcherError::MissingCredentials)
}

/// 新しいログイン情報を対話入力で作成
pub fn prompt_new_credentials(username: &str) -> Result<AuthConfig> {
    let password = dialoguer::Password::new()
        .with_prompt(format!("{} の新しいパスワード", username))
        .with_confirmation("もう一度入力", "パスワードが一致しません")
        .interact()
        .map_err(|_| MatcherError::MissingCredentials)?;

    Ok(AuthConfig {
        username: username.to_string(),
        password_sha256: hash_password(&password),
    })
}
