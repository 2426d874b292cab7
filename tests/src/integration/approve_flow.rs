//! # Approve Flow
//!
//! create → approve (provider) → co-sign (issuer) → broadcast (middleware).

#[cfg(test)]
mod tests {
    use super::super::{random_name, world};
    use qc_18_name_service::{
        AliasStatus, ErrorCode, LocalWallet, NameServiceApi, Overrides, ReceiptStatus, SignerRole,
    };

    #[tokio::test]
    async fn test_concrete_scenario() {
        let w = world();
        let wallet = LocalWallet::random();
        let name = random_name();
        assert_eq!(name.len(), 8);

        let receipt = w
            .service
            .create_alias(&wallet, &name, w.fee(), Overrides::default())
            .await
            .unwrap();
        assert_eq!(receipt.status_code(), 1);

        let tx = w.service.approve_alias(&name, &w.provider).await.unwrap();
        let tx = w
            .service
            .sign_alias_status_transaction(tx, &w.issuer)
            .await
            .unwrap();
        let receipt = w
            .service
            .send_alias_status_transaction(tx, &w.middleware, Overrides::default())
            .await
            .unwrap();
        assert_eq!(receipt.status_code(), 1);

        assert_eq!(w.service.resolve_name(&name).await.unwrap(), wallet.address());
        assert_eq!(w.service.lookup_address(wallet.address()).await.unwrap(), name);
        assert!(w
            .service
            .get_pending_alias(wallet.address())
            .await
            .unwrap()
            .is_none());
        assert!(w.ledger.with_registry(|r| r.verify_consistency()).is_ok());
    }

    #[tokio::test]
    async fn test_fresh_address_has_no_pending_alias() {
        let w = world();
        let wallet = LocalWallet::random();
        assert!(w
            .service
            .get_pending_alias(wallet.address())
            .await
            .unwrap()
            .is_none());
        assert_eq!(
            w.service
                .lookup_address(wallet.address())
                .await
                .unwrap_err()
                .code(),
            ErrorCode::NotFound
        );
    }

    #[tokio::test]
    async fn test_duplicate_create_before_resolution() {
        let w = world();
        let alice = LocalWallet::random();
        let bob = LocalWallet::random();
        let name = random_name();

        let first = w
            .service
            .create_alias(&alice, &name, w.fee(), Overrides::default())
            .await
            .unwrap();
        assert_eq!(first.status, ReceiptStatus::Success);

        // Same applicant, same name: identical resubmission never succeeds twice
        let again = w
            .service
            .create_alias(&alice, &name, w.fee(), Overrides::default())
            .await
            .unwrap();
        assert_eq!(again.status, ReceiptStatus::Failed);
        assert!(again.error.is_some_and(|c| c.is_benign_duplicate()));

        let other = w
            .service
            .create_alias(&bob, &name, w.fee(), Overrides::default())
            .await
            .unwrap();
        assert_eq!(other.error, Some(ErrorCode::Exists));

        let second_name = w
            .service
            .create_alias(&alice, &random_name(), w.fee(), Overrides::default())
            .await
            .unwrap();
        assert!(matches!(
            second_name.error,
            Some(ErrorCode::NotAllowed) | Some(ErrorCode::Exists)
        ));

        assert!(second_name
            .into_result()
            .unwrap_err()
            .code()
            .is_benign_duplicate());
    }

    #[tokio::test]
    async fn test_pending_name_does_not_resolve() {
        let w = world();
        let alice = LocalWallet::random();
        let name = random_name();
        w.service
            .create_alias(&alice, &name, w.fee(), Overrides::default())
            .await
            .unwrap();

        assert_eq!(
            w.service.resolve_name(&name).await.unwrap_err().code(),
            ErrorCode::InvalidAddress
        );
        assert_eq!(
            w.ledger.with_registry(|r| r.status_of(&name)),
            AliasStatus::Pending
        );
    }

    #[tokio::test]
    async fn test_second_status_after_approve_is_not_found() {
        let w = world();
        let alice = LocalWallet::random();
        let name = random_name();
        w.service
            .create_alias(&alice, &name, w.fee(), Overrides::default())
            .await
            .unwrap();

        // Two provider decisions built while the application is still pending
        let approve = w.service.approve_alias(&name, &w.provider).await.unwrap();
        let reject = w.service.reject_alias(&name, &w.provider).await.unwrap();

        let approve = w
            .service
            .sign_alias_status_transaction(approve, &w.issuer)
            .await
            .unwrap();
        let reject = w
            .service
            .sign_alias_status_transaction(reject, &w.issuer)
            .await
            .unwrap();

        let receipt = w
            .service
            .send_alias_status_transaction(approve, &w.middleware, Overrides::default())
            .await
            .unwrap();
        assert!(receipt.is_success());

        let receipt = w
            .service
            .send_alias_status_transaction(reject, &w.middleware, Overrides::default())
            .await
            .unwrap();
        assert_eq!(receipt.status, ReceiptStatus::Failed);
        assert_eq!(receipt.error, Some(ErrorCode::NotFound));
        assert_eq!(w.service.resolve_name(&name).await.unwrap(), alice.address());

        // And building a new one fails up front
        assert_eq!(
            w.service
                .approve_alias(&name, &w.provider)
                .await
                .unwrap_err()
                .code(),
            ErrorCode::NotFound
        );
    }

    #[tokio::test]
    async fn test_reapproval_moves_owner_to_new_name() {
        let w = world();
        let alice = LocalWallet::random();
        let first = random_name();
        let second = format!("{}-v2", random_name());

        for name in [&first, &second] {
            w.service
                .create_alias(&alice, name, w.fee(), Overrides::default())
                .await
                .unwrap();
            let tx = w.service.approve_alias(name, &w.provider).await.unwrap();
            let tx = w
                .service
                .sign_alias_status_transaction(tx, &w.issuer)
                .await
                .unwrap();
            w.service
                .send_alias_status_transaction(tx, &w.middleware, Overrides::default())
                .await
                .unwrap();
        }

        assert_eq!(w.service.lookup_address(alice.address()).await.unwrap(), second);
        assert_eq!(
            w.service.resolve_name(&first).await.unwrap_err().code(),
            ErrorCode::InvalidAddress
        );

        // Released name is free again
        let bob = LocalWallet::random();
        let receipt = w
            .service
            .create_alias(&bob, &first, w.fee(), Overrides::default())
            .await
            .unwrap();
        assert!(receipt.is_success());
    }

    #[tokio::test]
    async fn test_wrong_provider_cannot_initiate() {
        let w = world();
        let alice = LocalWallet::random();
        let name = random_name();
        w.service
            .create_alias(&alice, &name, w.fee(), Overrides::default())
            .await
            .unwrap();

        let impostor = LocalWallet::random();
        let tx = w.service.approve_alias(&name, &impostor).await.unwrap();
        let tx = w
            .service
            .sign_alias_status_transaction(tx, &w.issuer)
            .await
            .unwrap();
        let err = w
            .service
            .send_alias_status_transaction(tx, &w.middleware, Overrides::default())
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::Unauthorized);
        assert!(w
            .service
            .get_pending_alias(alice.address())
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_observer_sees_protocol_order() {
        let w = world();
        let alice = LocalWallet::random();
        let name = random_name();
        w.service
            .create_alias(&alice, &name, w.fee(), Overrides::default())
            .await
            .unwrap();
        let tx = w.service.approve_alias(&name, &w.provider).await.unwrap();
        let tx = w
            .service
            .sign_alias_status_transaction(tx, &w.issuer)
            .await
            .unwrap();
        w.service
            .send_alias_status_transaction(tx, &w.middleware, Overrides::default())
            .await
            .unwrap();

        assert_eq!(
            w.service.observer().signing_roles(),
            vec![
                SignerRole::Applicant,
                SignerRole::Provider,
                SignerRole::Issuer,
                SignerRole::Middleware,
            ]
        );
        let methods = w.service.observer().methods();
        assert!(methods.contains(&"submit_application".to_string()));
        assert_eq!(methods.last().map(String::as_str), Some("submit_status"));
    }
}
