//! End-to-end session tests: identity payload in, guarded decisions out.

use std::sync::Arc;

use tkeeper_authz::identity::memory::MemoryIdentity;
use tkeeper_authz::{AuthContext, AuthError, AuthState, ContextConfig, Identity};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// A `/me` response as the key-management API returns it.
const OPERATOR_ME: &str = r#"{
    "subject": "operator@tkeeper",
    "permissions": [
        "tkeeper.key.*.sign",
        "tkeeper.key.*.verify",
        "-tkeeper.key.legacy.sign",
        "tkeeper.system.status",
        "tkeeper.dkg.*",
        7
    ]
}"#;

async fn operator_context() -> AuthContext<MemoryIdentity> {
    let identity: Identity = serde_json::from_str(OPERATOR_ME).unwrap();
    let mut ctx = AuthContext::new(MemoryIdentity::new(identity), ContextConfig::default());
    ctx.load().await.unwrap();
    ctx
}

#[tokio::test]
async fn test_operator_key_scenario() {
    init_tracing();
    let ctx = operator_context().await;

    assert_eq!(ctx.subject(), Some("operator@tkeeper"));
    assert!(ctx.has_permission("tkeeper.key.prod1.sign"));
    assert!(!ctx.has_permission("tkeeper.key.legacy.sign"));
    assert!(!ctx.has_permission("tkeeper.key.prod1.destroy"));
    assert!(!ctx.has_permission("tkeeper.key.a.b.sign"));
    assert!(ctx.has_permission("tkeeper.dkg.frost"));
    assert!(!ctx.has_permission("tkeeper.system.seal"));
}

#[tokio::test]
async fn test_guards_at_action_boundary() {
    init_tracing();
    let ctx = operator_context().await;

    // Sign action: the caller catches the denial and shows the message.
    let outcome = ctx.require_permission("tkeeper.key.legacy.sign", "Signing with this key is not allowed");
    match outcome {
        Err(AuthError::AccessDenied { message, .. }) => {
            assert_eq!(message, "Signing with this key is not allowed")
        }
        other => panic!("expected AccessDenied, got {other:?}"),
    }

    // Seal/unseal page: either permission is enough to open it.
    let err = ctx
        .require_any(["tkeeper.system.seal", "tkeeper.system.unseal"], "No seal access")
        .unwrap_err();
    assert_eq!(err.code(), "ACCESS_DENIED");

    assert!(ctx
        .require_any(["tkeeper.system.seal", "tkeeper.system.status"], "No access")
        .is_ok());
}

#[tokio::test]
async fn test_logout_then_login_as_other_subject() {
    init_tracing();
    let mut ctx = operator_context().await;
    ctx.reset();
    assert_eq!(ctx.state(), AuthState::Unauthenticated);

    ctx.identity_source().set_identity(Identity::new(
        "auditor@tkeeper",
        ["tkeeper.audit.log.verify", "tkeeper.compliance.inventory"],
    ));
    ctx.load().await.unwrap();

    assert_eq!(ctx.subject(), Some("auditor@tkeeper"));
    assert!(ctx.has_permission("tkeeper.audit.log.verify"));
    assert!(!ctx.has_permission("tkeeper.key.prod1.sign"));
}

#[tokio::test]
async fn test_independent_contexts_are_isolated() {
    let alice = Arc::new(MemoryIdentity::new(Identity::new("alice", ["tkeeper.system.*"])));
    let bob = Arc::new(MemoryIdentity::new(Identity::new("bob", ["tkeeper.storage.write"])));

    let mut a = AuthContext::new(alice, ContextConfig::default());
    let mut b = AuthContext::new(bob, ContextConfig::default());
    a.load().await.unwrap();
    b.load().await.unwrap();

    assert!(a.has_permission("tkeeper.system.seal"));
    assert!(!b.has_permission("tkeeper.system.seal"));

    b.reset();
    assert!(a.is_authenticated());
}

#[tokio::test]
async fn test_session_snapshot_shared_across_threads() {
    let ctx = operator_context().await;
    let session = ctx.session();

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let session = Arc::clone(&session);
            std::thread::spawn(move || {
                for i in 0..500 {
                    let key = format!("k{}", (i + t) % 300);
                    let sign = format!("tkeeper.key.{key}.sign");
                    let destroy = format!("tkeeper.key.{key}.destroy");
                    assert!(session.permissions().has(&sign));
                    assert!(!session.permissions().has(&destroy));
                    assert!(!session.permissions().has("tkeeper.key.legacy.sign"));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert!(session.permissions().cache_len() <= session.permissions().cache_capacity());
}
