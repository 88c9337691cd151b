#![allow(missing_docs)]

use alloy::primitives::{B256, b256};
use mockito::{Matcher, Server, ServerGuard};
use p256::{
    FieldBytes,
    ecdsa::{Signature, VerifyingKey, signature::hazmat::PrehashVerifier},
};
use passkey_validator::{
    ValidatorError,
    credential::{WebAuthnKeyRequest, to_webauthn_key},
    error::{CredentialError, ServerError},
    server::HttpPasskeyServer,
    signers::{ModuleSigner, P256Key, SoftAuthenticator},
    types::{SignableMessage, WebAuthnSignature},
    validator::PasskeyValidator,
};
use serde_json::json;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use url::Url;

const SECRET: B256 = b256!("0x4242424242424242424242424242424242424242424242424242424242424242");

async fn setup() -> (ServerGuard, HttpPasskeyServer, SoftAuthenticator) {
    let server = Server::new_async().await;
    let client = HttpPasskeyServer::new(Url::parse(&server.url()).unwrap());
    let authenticator = SoftAuthenticator::load(&SECRET, "localhost").unwrap();
    (server, client, authenticator)
}

fn creation_options() -> serde_json::Value {
    json!({
        "challenge": "c2lnbi1tZS11cA",
        "rp": { "name": "Passkey Demo", "id": "localhost" },
        "user": { "id": "dXNlci0x", "name": "alice", "displayName": "alice" },
        "pubKeyCredParams": [{ "alg": -7, "type": "public-key" }],
        "attestation": "none"
    })
}

#[tokio::test]
async fn register_with_passkey_server() -> eyre::Result<()> {
    let (mut server, client, authenticator) = setup().await;

    let options = server
        .mock("POST", "/register/options")
        .match_body(Matcher::Json(json!({ "username": "alice" })))
        .with_header("content-type", "application/json")
        .with_body(creation_options().to_string())
        .create_async()
        .await;
    let verify = server
        .mock("POST", "/register/verify")
        .match_body(Matcher::PartialJson(json!({
            "userId": "dXNlci0x",
            "username": "alice",
            "cred": { "id": authenticator.credential_id(), "type": "public-key" }
        })))
        .with_header("content-type", "application/json")
        .with_body(r#"{"verified":true}"#)
        .create_async()
        .await;

    let key = to_webauthn_key(WebAuthnKeyRequest::register("alice"), &client, &authenticator)
        .await?;

    options.assert_async().await;
    verify.assert_async().await;

    assert_eq!((key.pub_x(), key.pub_y()), authenticator.coordinates());
    assert_eq!(key.authenticator_id(), authenticator.credential_id());
    Ok(())
}

#[tokio::test]
async fn unverified_registration_yields_no_key() {
    let (mut server, client, authenticator) = setup().await;

    server
        .mock("POST", "/register/options")
        .with_body(creation_options().to_string())
        .create_async()
        .await;
    server
        .mock("POST", "/register/verify")
        .with_body(r#"{"verified":false}"#)
        .create_async()
        .await;

    let err = to_webauthn_key(WebAuthnKeyRequest::register("alice"), &client, &authenticator)
        .await
        .unwrap_err();
    assert!(matches!(err, ValidatorError::Credential(CredentialError::RegistrationNotVerified)));
}

#[tokio::test]
async fn server_error_status_is_reported() {
    let (mut server, client, authenticator) = setup().await;

    server
        .mock("POST", "/register/options")
        .with_status(500)
        .with_body("boom")
        .create_async()
        .await;

    let err = to_webauthn_key(WebAuthnKeyRequest::register("alice"), &client, &authenticator)
        .await
        .unwrap_err();
    match err {
        ValidatorError::Server(ServerError::PasskeyServerStatus { status, body }) => {
            assert_eq!(status.as_u16(), 500);
            assert_eq!(body, "boom");
        }
        err => panic!("unexpected error: {err:?}"),
    }
}

#[tokio::test]
async fn malformed_server_response_is_reported() {
    let (mut server, client, authenticator) = setup().await;

    server
        .mock("POST", "/login/options")
        .with_body(r#"{"unexpected":true}"#)
        .create_async()
        .await;

    let err =
        to_webauthn_key(WebAuthnKeyRequest::login(), &client, &authenticator).await.unwrap_err();
    assert!(matches!(
        err,
        ValidatorError::Server(ServerError::UnexpectedServerResponse {
            endpoint: "login/options",
            ..
        })
    ));
}

#[tokio::test]
async fn login_with_passkey_server() -> eyre::Result<()> {
    let (mut server, client, authenticator) = setup().await;

    let options = server
        .mock("POST", "/login/options")
        .match_body(Matcher::Json(json!({})))
        .with_body(json!({ "challenge": "bG9naW4", "rpId": "localhost" }).to_string())
        .create_async()
        .await;
    let verify = server
        .mock("POST", "/login/verify")
        .match_body(Matcher::PartialJson(json!({
            "cred": { "id": authenticator.credential_id() }
        })))
        .with_body(
            json!({
                "verification": { "verified": true },
                "pubkey": authenticator.spki()?,
                "userId": "dXNlci0x"
            })
            .to_string(),
        )
        .create_async()
        .await;

    let key = to_webauthn_key(WebAuthnKeyRequest::login(), &client, &authenticator).await?;

    options.assert_async().await;
    verify.assert_async().await;
    assert_eq!((key.pub_x(), key.pub_y()), authenticator.coordinates());
    Ok(())
}

#[tokio::test]
async fn registered_key_signs_user_operations() -> eyre::Result<()> {
    let (mut server, client, authenticator) = setup().await;

    server
        .mock("POST", "/register/options")
        .with_body(creation_options().to_string())
        .create_async()
        .await;
    server
        .mock("POST", "/register/verify")
        .with_body(r#"{"verified":true}"#)
        .create_async()
        .await;

    let key = to_webauthn_key(WebAuthnKeyRequest::register("alice"), &client, &authenticator)
        .await?;
    let verifying_key = *authenticator.signing_key().verifying_key();
    let validator = PasskeyValidator::new(key, Arc::new(authenticator)).with_chain_id(Some(8453));

    let hash = b256!("0x0101010101010101010101010101010101010101010101010101010101010101");
    let encoded = validator.sign_user_op_hash(SignableMessage::from(hash)).await?;
    let signature = WebAuthnSignature::decode(&encoded)?;

    assert!(signature.usePrecompiled);
    let location = signature.responseTypeLocation.to::<usize>();
    assert!(signature.clientDataJSON[location..].starts_with(r#""webauthn.get""#));

    let mut hasher = Sha256::new();
    hasher.update(&signature.authenticatorData);
    hasher.update(Sha256::digest(signature.clientDataJSON.as_bytes()));
    let ecdsa = Signature::from_scalars(
        FieldBytes::clone_from_slice(&signature.r.to_be_bytes::<32>()),
        FieldBytes::clone_from_slice(&signature.s.to_be_bytes::<32>()),
    )?;
    verifying_key.verify_prehash(&hasher.finalize(), &ecdsa)?;

    let stub = WebAuthnSignature::decode(&validator.stub_signature())?;
    assert_eq!(stub.authenticatorData.len(), signature.authenticatorData.len());
    assert!(!stub.usePrecompiled);
    Ok(())
}
