//! # Reject Flow
//!
//! A rejected application frees its name and leaves the applicant with a
//! restricted reverse lookup until a later approval.

#[cfg(test)]
mod tests {
    use super::super::{random_name, world, World};
    use qc_18_name_service::{
        AliasStatus, ErrorCode, LocalWallet, NameServiceApi, Overrides, ReceiptStatus,
    };

    async fn reject(w: &World, name: &str) {
        let tx = w.service.reject_alias(name, &w.provider).await.unwrap();
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
        assert_eq!(receipt.status, ReceiptStatus::Success);
    }

    #[tokio::test]
    async fn test_reject_path() {
        let w = world();
        let alice = LocalWallet::random();
        let name = random_name();
        w.service
            .create_alias(&alice, &name, w.fee(), Overrides::default())
            .await
            .unwrap();

        reject(&w, &name).await;

        assert!(w
            .service
            .get_pending_alias(alice.address())
            .await
            .unwrap()
            .is_none());
        assert_eq!(
            w.service.resolve_name(&name).await.unwrap_err().code(),
            ErrorCode::InvalidAddress
        );
        assert_eq!(
            w.service
                .lookup_address(alice.address())
                .await
                .unwrap_err()
                .code(),
            ErrorCode::NotAllowed
        );
        assert_eq!(
            w.ledger.with_registry(|r| r.status_of(&name)),
            AliasStatus::None
        );

        for approve in [true, false] {
            let result = if approve {
                w.service.approve_alias(&name, &w.provider).await
            } else {
                w.service.reject_alias(&name, &w.provider).await
            };
            assert_eq!(result.unwrap_err().code(), ErrorCode::NotFound);
        }
    }

    #[tokio::test]
    async fn test_rejected_name_available_to_anyone() {
        let w = world();
        let alice = LocalWallet::random();
        let bob = LocalWallet::random();
        let name = random_name();
        w.service
            .create_alias(&alice, &name, w.fee(), Overrides::default())
            .await
            .unwrap();
        reject(&w, &name).await;

        let receipt = w
            .service
            .create_alias(&bob, &name, w.fee(), Overrides::default())
            .await
            .unwrap();
        assert!(receipt.is_success());
        assert_eq!(
            w.service
                .get_pending_alias(bob.address())
                .await
                .unwrap()
                .map(|a| a.name),
            Some(name)
        );
    }

    #[tokio::test]
    async fn test_reapply_after_reject_then_approve_lifts_restriction() {
        let w = world();
        let alice = LocalWallet::random();
        let first = random_name();
        w.service
            .create_alias(&alice, &first, w.fee(), Overrides::default())
            .await
            .unwrap();
        reject(&w, &first).await;

        let second = random_name();
        w.service
            .create_alias(&alice, &second, w.fee(), Overrides::default())
            .await
            .unwrap();
        // Still restricted while the new application is pending
        assert_eq!(
            w.service
                .lookup_address(alice.address())
                .await
                .unwrap_err()
                .code(),
            ErrorCode::NotAllowed
        );

        let tx = w.service.approve_alias(&second, &w.provider).await.unwrap();
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
            w.service.lookup_address(alice.address()).await.unwrap(),
            second
        );
    }

    #[tokio::test]
    async fn test_stale_reject_cannot_touch_new_application() {
        let w = world();
        let alice = LocalWallet::random();
        let bob = LocalWallet::random();
        let name = random_name();

        w.service
            .create_alias(&alice, &name, w.fee(), Overrides::default())
            .await
            .unwrap();
        let stale = w.service.reject_alias(&name, &w.provider).await.unwrap();
        let stale = w
            .service
            .sign_alias_status_transaction(stale, &w.issuer)
            .await
            .unwrap();
        reject(&w, &name).await;

        // Bob takes the freed name; the stale reject still references Alice's application
        w.service
            .create_alias(&bob, &name, w.fee(), Overrides::default())
            .await
            .unwrap();
        let receipt = w
            .service
            .send_alias_status_transaction(stale, &w.middleware, Overrides::default())
            .await
            .unwrap();
        assert_eq!(receipt.error, Some(ErrorCode::NotFound));
        assert_eq!(
            w.ledger.with_registry(|r| r.status_of(&name)),
            AliasStatus::Pending
        );
    }
}
