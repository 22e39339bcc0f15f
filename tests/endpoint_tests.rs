//! Endpoint operations against canned console answers.

mod common;

use common::*;
use school_console::endpoints::paths;
use school_console::transport::RequestBody;
use school_console::{
    Account, AccountType, CloudService, CloudServiceUpdate, ConsoleError, GroupOrigin,
    HttpResponse, ListAction, Method, Outcome, SchoolId, ServiceStatus,
};
use serde_json::json;

fn json_body(request: &school_console::HttpRequest) -> serde_json::Value {
    match &request.body {
        Some(RequestBody::Json(value)) => value.clone(),
        other => panic!("expected a JSON body, got {:?}", other),
    }
}

mod validation {
    use super::*;

    #[tokio::test]
    async fn test_invalid_school_rejected_before_any_request() {
        let ctx = TestContext::connected().await.with_roster();
        let mut account = Account::from_record(&Default::default());
        account.username = "ab1234".to_string();
        account.distinguished_name = "CN=ab1234,OU=Students".to_string();

        for bad in ["123", "12345", "abcd", "12a4", "", " 1234"] {
            assert!(matches!(
                ctx.client.list_groups(bad, None).await,
                Err(ConsoleError::InvalidSchool { .. })
            ));
            assert!(matches!(
                ctx.client.get_roster(bad, false).await,
                Err(ConsoleError::InvalidSchool { .. })
            ));
            assert!(matches!(
                ctx.client.reset_password(bad, "ab1234", Some("pw")).await,
                Err(ConsoleError::InvalidSchool { .. })
            ));
            assert!(matches!(
                ctx.client.create_distribution_list(bad, "staff").await,
                Err(ConsoleError::InvalidSchool { .. })
            ));
            assert!(matches!(
                ctx.client.remove_distribution_list(bad, "staff").await,
                Err(ConsoleError::InvalidSchool { .. })
            ));
            assert!(matches!(
                ctx.client.list_distribution_lists(bad).await,
                Err(ConsoleError::InvalidSchool { .. })
            ));
            assert!(matches!(
                ctx.client
                    .add_distribution_list_member(bad, "ab1234", "1234-dl-staff")
                    .await,
                Err(ConsoleError::InvalidSchool { .. })
            ));
            assert!(matches!(
                ctx.client
                    .remove_distribution_list_member(bad, "ab1234", "1234-dl-staff")
                    .await,
                Err(ConsoleError::InvalidSchool { .. })
            ));
            assert!(matches!(
                ctx.client.list_group_members(bad, "7A").await,
                Err(ConsoleError::InvalidSchool { .. })
            ));
            assert!(matches!(
                ctx.client.lookup_account(bad, "ab1234", false).await,
                Err(ConsoleError::InvalidSchool { .. })
            ));
            assert!(matches!(
                ctx.client.list_service_accounts(bad).await,
                Err(ConsoleError::InvalidSchool { .. })
            ));
            assert!(matches!(
                ctx.client
                    .reset_account_password(bad, &account, Some("pw"))
                    .await,
                Err(ConsoleError::InvalidSchool { .. })
            ));
            assert!(matches!(
                ctx.client.get_school(bad).await,
                Err(ConsoleError::InvalidSchool { .. })
            ));
            assert!(matches!(
                ctx.client.invalidate_roster(bad).await,
                Err(ConsoleError::InvalidSchool { .. })
            ));
        }
        assert_eq!(ctx.transport.request_count(), 0);
        assert_eq!(ctx.cached_files(), 0);
    }

    #[tokio::test]
    async fn test_school_checked_before_session() {
        let ctx = TestContext::new();

        let err = ctx.client.list_service_accounts("12").await.unwrap_err();
        assert!(matches!(err, ConsoleError::InvalidSchool { ref school_id } if school_id == "12"));
        assert!(err.is_validation());
    }
}

mod schools {
    use super::*;

    #[tokio::test]
    async fn test_list_schools_skips_records_without_id() {
        let ctx = TestContext::connected().await;
        ctx.transport.on(Method::Get, paths::SCHOOLS, json("schools.json"));

        let schools = ctx.client.list_schools().await.unwrap();
        assert_eq!(schools.len(), 2);
        assert_eq!(schools[0].id.as_str(), "1234");
        assert_eq!(schools[0].name, "Northfield Primary");
        // Numeric ids are zero-padded
        assert_eq!(schools[1].id.as_str(), "0421");
    }

    #[tokio::test]
    async fn test_schools_fetched_once_per_session() {
        let mut ctx = TestContext::connected().await;
        ctx.transport.on(Method::Get, paths::SCHOOLS, json("schools.json"));

        ctx.client.list_schools().await.unwrap();
        ctx.client.list_schools().await.unwrap();
        assert!(ctx.client.has_school(&SchoolId::new("0421").unwrap()).await.unwrap());
        assert_eq!(ctx.transport.count(Method::Get, paths::SCHOOLS), 1);

        // A new session starts with an empty school list
        ctx.client.connect(&credentials()).await.unwrap();
        ctx.client.list_schools().await.unwrap();
        assert_eq!(ctx.transport.count(Method::Get, paths::SCHOOLS), 2);
    }

    #[tokio::test]
    async fn test_get_school() {
        let ctx = TestContext::connected().await;
        ctx.transport.on(Method::Get, paths::SCHOOLS, json("schools.json"));

        let school = ctx.client.get_school("1234").await.unwrap().unwrap();
        assert_eq!(school.name, "Northfield Primary");
        assert!(ctx.client.get_school("9999").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_failed_school_fetch_is_retried() {
        let ctx = TestContext::connected().await;
        ctx.transport
            .on(Method::Get, paths::SCHOOLS, status(503))
            .on(Method::Get, paths::SCHOOLS, json("schools.json"));

        assert!(matches!(
            ctx.client.list_schools().await,
            Err(ConsoleError::Http { status: 503, .. })
        ));
        assert_eq!(ctx.client.list_schools().await.unwrap().len(), 2);
    }
}

mod groups {
    use super::*;

    fn serve_groups(ctx: &TestContext) {
        ctx.transport
            .on(Method::Get, &paths::groups(&school()), json("groups.json"));
    }

    #[tokio::test]
    async fn test_list_groups_central_then_local() {
        let ctx = TestContext::connected().await;
        serve_groups(&ctx);

        let groups = ctx.client.list_groups(SCHOOL, None).await.unwrap();
        let names: Vec<&str> = groups.iter().map(|g| g.group_name.as_str()).collect();
        assert_eq!(names, vec!["All Staff", "Year 7", "7A", "Chess Club", "Empty Club"]);
        assert_eq!(groups[1].origin, GroupOrigin::Central);
        assert_eq!(groups[2].origin, GroupOrigin::Local);
        assert_eq!(groups[2].distinguished_name, "CN=7A,OU=1234,DC=district,DC=local");
    }

    #[tokio::test]
    async fn test_list_groups_filter_is_exact() {
        let ctx = TestContext::connected().await;
        serve_groups(&ctx);

        let chess = ctx.client.list_groups(SCHOOL, Some("Chess Club")).await.unwrap();
        assert_eq!(chess.len(), 1);
        assert_eq!(chess[0].origin, GroupOrigin::Local);

        assert!(ctx.client.list_groups(SCHOOL, Some("chess club")).await.unwrap().is_empty());
        assert!(ctx.client.list_groups(SCHOOL, Some("Chess")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_collection_is_empty() {
        let ctx = TestContext::connected().await;
        ctx.transport.on(
            Method::Get,
            &paths::groups(&school()),
            HttpResponse::new(200, r#"{"centralGroups":[{"_groupName":"All Staff"}],"localGroups":null}"#),
        );

        let groups = ctx.client.list_groups(SCHOOL, None).await.unwrap();
        assert_eq!(groups.len(), 1);
    }

    #[tokio::test]
    async fn test_list_group_members_resolves_dn() {
        let ctx = TestContext::connected().await;
        serve_groups(&ctx);
        let members_path = paths::group_members(&school());
        ctx.transport
            .on(Method::Get, &members_path, json("group_members.json"));

        let members = ctx.client.list_group_members(SCHOOL, "7A").await.unwrap();
        assert_eq!(members.len(), 2);
        assert_eq!(members[0].username, "ab1234");
        assert_eq!(members[0].display_name, "Ada Byron");
        assert!(members[0].can_delete);
        assert!(!members[1].can_delete);

        let request = ctx.transport.last(Method::Get, &members_path).unwrap();
        assert_eq!(
            request.query_value("dn"),
            Some("CN=7A,OU=1234,DC=district,DC=local")
        );
    }

    #[tokio::test]
    async fn test_group_without_members() {
        let ctx = TestContext::connected().await;
        serve_groups(&ctx);
        ctx.transport.on(
            Method::Get,
            &paths::group_members(&school()),
            HttpResponse::new(200, "null"),
        );

        let members = ctx.client.list_group_members(SCHOOL, "Empty Club").await.unwrap();
        assert!(members.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_group_not_found() {
        let ctx = TestContext::connected().await;
        serve_groups(&ctx);

        let err = ctx.client.list_group_members(SCHOOL, "Robotics").await.unwrap_err();
        match err {
            ConsoleError::GroupNotFound {
                school_id,
                group_name,
            } => {
                assert_eq!(school_id, "1234");
                assert_eq!(group_name, "Robotics");
            }
            other => panic!("expected GroupNotFound, got {:?}", other),
        }
        assert_eq!(
            ctx.transport.count(Method::Get, &paths::group_members(&school())),
            0
        );
    }
}

mod service_accounts {
    use super::*;

    #[tokio::test]
    async fn test_list_service_accounts() {
        let ctx = TestContext::connected().await;
        ctx.transport.on(
            Method::Get,
            &paths::service_accounts(&school()),
            json("service_accounts.json"),
        );

        let accounts = ctx.client.list_service_accounts(SCHOOL).await.unwrap();
        assert_eq!(accounts.len(), 2);

        let print = &accounts[0];
        assert_eq!(print.username, "svc-print");
        assert!(!print.disabled);
        assert_eq!(
            print.when_created.unwrap().to_string(),
            "2021-08-16 07:45:12"
        );

        let kiosk = &accounts[1];
        assert!(kiosk.disabled);
        assert_eq!(kiosk.when_created, None);
        assert_eq!(kiosk.raw["whenCreated"], json!("not recorded"));
    }

    #[tokio::test]
    async fn test_service_accounts_http_error() {
        let ctx = TestContext::connected().await;

        let err = ctx.client.list_service_accounts(SCHOOL).await.unwrap_err();
        assert!(matches!(err, ConsoleError::Http { status: 404, .. }));
    }
}

mod passwords {
    use super::*;

    const WORD_URL: &str = "https://words.test/word";

    #[tokio::test]
    async fn test_unknown_identity_is_no_selection() {
        let ctx = TestContext::connected().await.with_roster();

        let outcome = ctx.client.reset_password(SCHOOL, "zz9999", Some("pw")).await.unwrap();
        assert_eq!(outcome, Outcome::NoSelection);
        assert_eq!(
            ctx.transport.count(Method::Post, &paths::student_password(&school())),
            0
        );
    }

    #[tokio::test]
    async fn test_reset_with_explicit_password() {
        let ctx = TestContext::connected().await.with_roster();
        let password_path = paths::student_password(&school());
        ctx.transport.on(Method::Post, &password_path, ok());

        let reset = ctx
            .client
            .reset_password(SCHOOL, "ab1234", Some("Winter-2024"))
            .await
            .unwrap()
            .completed()
            .unwrap();
        assert_eq!(reset.name, "Ada Byron");
        assert_eq!(reset.username, "ab1234");
        assert_eq!(reset.new_password, "Winter-2024");

        let request = ctx.transport.last(Method::Post, &password_path).unwrap();
        assert_eq!(
            json_body(&request),
            json!({
                "distinguishedName": "CN=ab1234,OU=Students,OU=1234,DC=district,DC=local",
                "password": "Winter-2024"
            })
        );
        assert_eq!(ctx.transport.count(Method::Get, WORD_URL), 0);
    }

    #[tokio::test]
    async fn test_reset_with_generated_password() {
        let ctx = TestContext::connected().await.with_roster();
        ctx.transport
            .on(Method::Post, &paths::student_password(&school()), ok())
            .on(Method::Get, WORD_URL, HttpResponse::new(200, r#"["otter"]"#));

        let reset = ctx
            .client
            .reset_password(SCHOOL, "ef9012", None)
            .await
            .unwrap()
            .completed()
            .unwrap();
        assert_eq!(reset.new_password, "otter!A1");
        assert_eq!(ctx.transport.count(Method::Get, WORD_URL), 1);
    }

    #[tokio::test]
    async fn test_rejected_reset_is_operation_error() {
        let ctx = TestContext::connected().await.with_roster();
        ctx.transport
            .on(Method::Post, &paths::student_password(&school()), status(400));

        let err = ctx
            .client
            .reset_password(SCHOOL, "ab1234", Some("pw"))
            .await
            .unwrap_err();
        match err {
            ConsoleError::Operation { action, source } => {
                assert!(action.contains("ab1234"));
                assert!(matches!(*source, ConsoleError::Http { status: 400, .. }));
            }
            other => panic!("expected Operation, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_word_service_failure_is_operation_error() {
        let ctx = TestContext::connected().await.with_roster();
        ctx.transport.on(Method::Get, WORD_URL, HttpResponse::new(200, "[]"));

        let err = ctx.client.reset_password(SCHOOL, "ab1234", None).await.unwrap_err();
        match err {
            ConsoleError::Operation { source, .. } => {
                assert!(matches!(*source, ConsoleError::PasswordGeneration { .. }));
            }
            other => panic!("expected Operation, got {:?}", other),
        }
        assert_eq!(
            ctx.transport.count(Method::Post, &paths::student_password(&school())),
            0
        );
    }
}

mod cloud_services {
    use super::*;

    #[tokio::test]
    async fn test_toggle_confirms_each_identity() {
        let ctx = TestContext::connected().await;
        let path = paths::cloud_services(AccountType::Student);
        ctx.transport.on(Method::Post, &path, ok());

        let update = ctx
            .client
            .set_cloud_service(
                &["ab1234", "cd5678", "ef9012"],
                AccountType::Student,
                CloudService::Canva,
                ServiceStatus::Enabled,
            )
            .await
            .unwrap();

        let CloudServiceUpdate::Updated { confirmations } = update else {
            panic!("expected Updated, got {:?}", update);
        };
        let identities: Vec<&str> = confirmations.iter().map(|c| c.identity.as_str()).collect();
        assert_eq!(identities, vec!["ab1234", "cd5678", "ef9012"]);
        assert!(confirmations.iter().all(|c| c.service == CloudService::Canva
            && c.status == ServiceStatus::Enabled
            && c.account_type == AccountType::Student));

        // One request for the whole batch
        assert_eq!(ctx.transport.count(Method::Post, &path), 1);
        let request = ctx.transport.last(Method::Post, &path).unwrap();
        assert_eq!(
            json_body(&request),
            json!({
                "identities": ["ab1234", "cd5678", "ef9012"],
                "service": "canva",
                "status": "Enabled"
            })
        );
    }

    #[tokio::test]
    async fn test_toggle_failure_collapses() {
        let ctx = TestContext::connected().await;
        let path = paths::cloud_services(AccountType::Staff);
        ctx.transport.on(Method::Post, &path, status(500));

        let update = ctx
            .client
            .set_cloud_service(
                &["t.smith".to_string(), "j.doe".to_string()],
                AccountType::Staff,
                CloudService::Google,
                ServiceStatus::Disabled,
            )
            .await
            .unwrap();

        match update {
            CloudServiceUpdate::Failed { message } => {
                assert!(message.contains("google"));
            }
            other => panic!("expected Failed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_toggle_transport_failure_collapses() {
        let ctx = TestContext::connected().await;
        ctx.transport.fail(
            Method::Post,
            &paths::cloud_services(AccountType::ServiceAccount),
            "connection reset",
        );

        let update = ctx
            .client
            .set_cloud_service(
                &["svc-print"],
                AccountType::ServiceAccount,
                CloudService::Microsoft,
                ServiceStatus::Enabled,
            )
            .await
            .unwrap();
        assert!(!update.is_updated());
    }

    #[tokio::test]
    async fn test_toggle_empty_batch_sends_nothing() {
        let ctx = TestContext::connected().await;
        let none: [&str; 0] = [];

        let update = ctx
            .client
            .set_cloud_service(&none, AccountType::Student, CloudService::Apple, ServiceStatus::Enabled)
            .await
            .unwrap();
        assert_eq!(
            update,
            CloudServiceUpdate::Updated {
                confirmations: Vec::new()
            }
        );
        assert_eq!(ctx.transport.request_count(), 0);
    }
}

mod distribution_lists {
    use super::*;

    #[tokio::test]
    async fn test_list_distribution_lists() {
        let ctx = TestContext::connected().await;
        ctx.transport.on(
            Method::Get,
            &paths::distribution_lists(&school()),
            json("distribution_lists.json"),
        );

        let lists = ctx.client.list_distribution_lists(SCHOOL).await.unwrap();
        let names: Vec<&str> = lists.iter().map(|l| l.group_name.as_str()).collect();
        assert_eq!(names, vec!["1234-dl-staff", "1234-dl-parents"]);
    }

    #[tokio::test]
    async fn test_create_synthesizes_list_name() {
        let ctx = TestContext::connected().await;
        let path = paths::distribution_lists(&school());
        ctx.transport.on(Method::Post, &path, ok());

        let change = ctx.client.create_distribution_list(SCHOOL, "choir").await.unwrap();
        assert_eq!(change.list_name, "1234-dl-choir");
        assert_eq!(change.action, ListAction::Created);

        let request = ctx.transport.last(Method::Post, &path).unwrap();
        assert_eq!(json_body(&request), json!({ "name": "1234-dl-choir" }));
    }

    #[tokio::test]
    async fn test_remove_sends_full_name() {
        let ctx = TestContext::connected().await;
        let path = paths::distribution_lists(&school());
        ctx.transport.on(Method::Delete, &path, ok());

        let change = ctx.client.remove_distribution_list(SCHOOL, "choir").await.unwrap();
        assert_eq!(change.list_name, "1234-dl-choir");
        assert_eq!(change.action, ListAction::Removed);

        let request = ctx.transport.last(Method::Delete, &path).unwrap();
        assert_eq!(request.query_value("name"), Some("1234-dl-choir"));
    }

    #[tokio::test]
    async fn test_rejected_create_is_operation_error() {
        let ctx = TestContext::connected().await;
        ctx.transport
            .on(Method::Post, &paths::distribution_lists(&school()), status(409));

        let err = ctx.client.create_distribution_list(SCHOOL, "staff").await.unwrap_err();
        assert!(matches!(err, ConsoleError::Operation { .. }));
        assert!(err.to_string().contains("1234-dl-staff"));
    }

    #[tokio::test]
    async fn test_add_member() {
        let ctx = TestContext::connected().await.with_roster();
        let path = paths::distribution_list_members(&school());
        ctx.transport.on(Method::Post, &path, ok());

        let change = ctx
            .client
            .add_distribution_list_member(SCHOOL, "cd5678", "1234-dl-staff")
            .await
            .unwrap()
            .completed()
            .unwrap();
        assert_eq!(change.name, "Charles Dodgson");
        assert_eq!(change.username, "cd5678");
        assert_eq!(change.list_name, "1234-dl-staff");
        assert_eq!(change.action, ListAction::MemberAdded);

        let request = ctx.transport.last(Method::Post, &path).unwrap();
        assert_eq!(
            json_body(&request),
            json!({
                "listName": "1234-dl-staff",
                "distinguishedName": "CN=cd5678,OU=Students,OU=1234,DC=district,DC=local"
            })
        );
    }

    #[tokio::test]
    async fn test_remove_member() {
        let ctx = TestContext::connected().await.with_roster();
        let path = paths::distribution_list_members(&school());
        ctx.transport.on(Method::Delete, &path, ok());

        let change = ctx
            .client
            .remove_distribution_list_member(SCHOOL, "ab1234", "1234-dl-parents")
            .await
            .unwrap()
            .completed()
            .unwrap();
        assert_eq!(change.action, ListAction::MemberRemoved);

        let request = ctx.transport.last(Method::Delete, &path).unwrap();
        assert_eq!(request.query_value("listName"), Some("1234-dl-parents"));
        assert_eq!(
            request.query_value("dn"),
            Some("CN=ab1234,OU=Students,OU=1234,DC=district,DC=local")
        );
    }

    #[tokio::test]
    async fn test_unknown_member_is_no_selection() {
        let ctx = TestContext::connected().await.with_roster();

        let outcome = ctx
            .client
            .add_distribution_list_member(SCHOOL, "nobody", "1234-dl-staff")
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::NoSelection);
        assert_eq!(
            ctx.transport
                .count(Method::Post, &paths::distribution_list_members(&school())),
            0
        );
    }

    #[tokio::test]
    async fn test_rejected_membership_change_is_operation_error() {
        let ctx = TestContext::connected().await.with_roster();
        ctx.transport.on(
            Method::Delete,
            &paths::distribution_list_members(&school()),
            status(404),
        );

        let err = ctx
            .client
            .remove_distribution_list_member(SCHOOL, "ab1234", "1234-dl-gone")
            .await
            .unwrap_err();
        assert!(matches!(err, ConsoleError::Operation { .. }));
    }
}
