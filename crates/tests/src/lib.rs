//! # Integration Tests
//!
//! 集成测试与端到端测试。
//!
//! 负责：
//! - 合约快照测试（JSON 形态）
//! - 配置 -> 内存目录 -> RouteHandle -> GroupProducer 的 e2e 流程
//! - 替换客户端（自定义 `GroupService`）下的行为验证

#[cfg(test)]
mod contract_tests {
    use contracts::{Body, Group, Message, Operation};

    #[test]
    fn test_operation_wire_names() {
        let names: Vec<_> = Operation::ALL.iter().map(|op| op.as_str()).collect();
        assert_eq!(
            names,
            [
                "create",
                "get",
                "getAll",
                "update",
                "delete",
                "addUserToGroup",
                "checkUserGroup",
                "removeUserFromGroup",
            ]
        );
    }

    #[test]
    fn test_message_json_shape() {
        let message = Message::new()
            .with_header("operation", "update")
            .with_body(Body::Group(Group::new("ops").with_id("grp-1")));

        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["headers"]["operation"], "update");
        assert_eq!(json["body"]["group"]["name"], "ops");
        assert_eq!(json["fault"], false);

        let back: Message = serde_json::from_value(json).unwrap();
        assert_eq!(back, message);
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::sync::{Arc, Mutex};

    use config_loader::{ConfigFormat, ConfigLoader};
    use contracts::{headers, ActionResponse, Body, GroupSeed, Group, KeystoneConfig, Message};
    use identity_client::{GroupService, InMemoryGroupService, Result};
    use producer::{GroupProducer, RouteHandle};

    const CONFIG: &str = r#"
[endpoint]
host = "http://keystone.local:5000/v3"
username = "admin"
password = "secret"
project = "admin"
operation = "getAll"

[route]
queue_capacity = 8

[[directory.groups]]
name = "ops"
description = "operators"
domain_id = "default"

[[directory.groups]]
name = "dev"
domain_id = "default"
"#;

    fn load() -> KeystoneConfig {
        ConfigLoader::new().load_str(CONFIG, ConfigFormat::Toml).unwrap()
    }

    fn seeded_route(config: &KeystoneConfig) -> (Arc<InMemoryGroupService>, RouteHandle) {
        let service = Arc::new(InMemoryGroupService::new());
        service
            .seed(config.directory.groups.iter().map(GroupSeed::to_group))
            .unwrap();
        let producer = GroupProducer::from_endpoint(Arc::clone(&service), &config.endpoint);
        let route = RouteHandle::spawn("groups", producer, config.route.queue_capacity);
        (service, route)
    }

    /// 配置 -> 预置目录 -> RouteHandle -> 完整 CRUD 流程
    #[tokio::test]
    async fn test_e2e_config_driven_lifecycle() {
        let config = load();
        let (service, route) = seeded_route(&config);

        // 无 operation header：使用 endpoint 默认的 getAll
        let reply = route.request(Message::new()).await.unwrap();
        assert!(!reply.is_fault());
        assert_eq!(reply.body().as_groups().unwrap().len(), 2);

        // create
        let reply = route
            .request(
                Message::new()
                    .with_header(headers::OPERATION, "create")
                    .with_header(headers::NAME, "qa")
                    .with_header(headers::DESCRIPTION, "testers")
                    .with_header(headers::DOMAIN_ID, "default"),
            )
            .await
            .unwrap();
        let created = reply.body().as_group().unwrap().clone();
        let id = created.id.clone().unwrap();
        assert_eq!(created.description.as_deref(), Some("testers"));

        // get
        let reply = route
            .request(
                Message::new()
                    .with_header(headers::OPERATION, "get")
                    .with_header(headers::ID, id.as_str()),
            )
            .await
            .unwrap();
        assert_eq!(reply.body().as_group(), Some(&created));

        // update via body
        let mut renamed = created.clone();
        renamed.name = "quality".to_string();
        let reply = route
            .request(
                Message::new()
                    .with_header(headers::OPERATION, "update")
                    .with_body(Body::Group(renamed.clone())),
            )
            .await
            .unwrap();
        assert!(!reply.is_fault());
        assert_eq!(reply.body().as_group(), Some(&renamed));

        // delete twice: second one faults with the service's message
        for expect_fault in [false, true] {
            let reply = route
                .request(
                    Message::new()
                        .with_header(headers::OPERATION, "delete")
                        .with_header(headers::ID, id.as_str()),
                )
                .await
                .unwrap();
            assert_eq!(reply.is_fault(), expect_fault);
            if expect_fault {
                let text = reply.body().as_text().unwrap();
                assert!(text.contains("Could not find group"));
                assert!(text.contains("404"));
            }
        }

        let snapshot = route.metrics().snapshot();
        assert_eq!(snapshot.processed_count, 6);
        assert_eq!(snapshot.fault_count, 1);

        route.shutdown().await;
        assert_eq!(service.group_count(), 2);
    }

    #[tokio::test]
    async fn test_e2e_membership() {
        let config = load();
        let (_, route) = seeded_route(&config);

        let groups = route.request(Message::new()).await.unwrap();
        let group_id = groups.body().as_groups().unwrap()[0].id.clone().unwrap();

        let membership = |operation: &str| {
            Message::new()
                .with_header(headers::OPERATION, operation)
                .with_header(headers::GROUP_ID, group_id.as_str())
                .with_header(headers::USER_ID, "u-42")
        };

        let reply = route.request(membership("checkUserGroup")).await.unwrap();
        assert_eq!(reply.body().as_flag(), Some(false));

        let reply = route.request(membership("addUserToGroup")).await.unwrap();
        assert!(!reply.is_fault());

        let reply = route.request(membership("checkUserGroup")).await.unwrap();
        assert_eq!(reply.body().as_flag(), Some(true));

        let reply = route.request(membership("removeUserFromGroup")).await.unwrap();
        assert!(!reply.is_fault());

        let reply = route.request(membership("removeUserFromGroup")).await.unwrap();
        assert!(reply.is_fault());

        route.shutdown().await;
    }

    #[tokio::test]
    async fn test_e2e_faults_do_not_stop_the_route() {
        let config = load();
        let (_, route) = seeded_route(&config);

        let bad = [
            Message::new().with_header(headers::OPERATION, "purge"),
            Message::new().with_header(headers::OPERATION, "get"),
            Message::new()
                .with_header(headers::OPERATION, "update")
                .with_body(Body::Text("not a group".to_string())),
        ];
        for message in bad {
            let reply = route.request(message).await.unwrap();
            assert!(reply.is_fault());
            assert!(reply.body().as_text().is_some());
        }

        let reply = route.request(Message::new()).await.unwrap();
        assert!(!reply.is_fault());
        assert_eq!(route.metrics().fault_count(), 3);

        route.shutdown().await;
    }

    /// 记录调用参数的替换客户端
    #[derive(Default)]
    struct ScriptedService {
        created: Mutex<Vec<Group>>,
        fetched: Mutex<Vec<String>>,
        updated: Mutex<Vec<Group>>,
        listing: Vec<Group>,
        delete_response: Option<ActionResponse>,
    }

    impl GroupService for ScriptedService {
        async fn create(&self, group: &Group) -> Result<Group> {
            self.created.lock().unwrap().push(group.clone());
            Ok(group.clone().with_id("new-id"))
        }

        async fn get(&self, group_id: &str) -> Result<Option<Group>> {
            self.fetched.lock().unwrap().push(group_id.to_string());
            Ok(Some(Group::new("fetched").with_id(group_id)))
        }

        async fn list(&self) -> Result<Vec<Group>> {
            Ok(self.listing.clone())
        }

        async fn update(&self, group: &Group) -> Result<Group> {
            self.updated.lock().unwrap().push(group.clone());
            let mut renamed = group.clone();
            renamed.name = "newName".to_string();
            Ok(renamed)
        }

        async fn delete(&self, _group_id: &str) -> Result<ActionResponse> {
            Ok(self
                .delete_response
                .clone()
                .unwrap_or_else(ActionResponse::success))
        }

        async fn add_user_to_group(&self, _: &str, _: &str) -> Result<ActionResponse> {
            Ok(ActionResponse::success())
        }

        async fn check_group_user(&self, _: &str, _: &str) -> Result<bool> {
            Ok(true)
        }

        async fn remove_user_from_group(&self, _: &str, _: &str) -> Result<ActionResponse> {
            Ok(ActionResponse::success())
        }
    }

    #[tokio::test]
    async fn test_substituted_client_sees_exact_arguments() {
        let identical = Group::new("same").with_id("x");
        let service = Arc::new(ScriptedService {
            listing: vec![identical.clone(), identical],
            delete_response: Some(ActionResponse::failed("fail", 404)),
            ..Default::default()
        });
        let route = RouteHandle::spawn("scripted", GroupProducer::new(Arc::clone(&service)), 4);

        let reply = route
            .request(
                Message::new()
                    .with_header(headers::OPERATION, "create")
                    .with_header(headers::NAME, "n")
                    .with_header(headers::DESCRIPTION, "d")
                    .with_header(headers::DOMAIN_ID, "dom"),
            )
            .await
            .unwrap();
        assert_eq!(reply.body().as_group().unwrap().id.as_deref(), Some("new-id"));
        let handed = service.created.lock().unwrap()[0].clone();
        assert_eq!(
            handed,
            Group::new("n").with_description("d").with_domain_id("dom")
        );

        route
            .request(
                Message::new()
                    .with_header(headers::OPERATION, "get")
                    .with_header(headers::ID, "abc"),
            )
            .await
            .unwrap();
        assert_eq!(*service.fetched.lock().unwrap(), ["abc"]);

        let reply = route
            .request(Message::new().with_header(headers::OPERATION, "getAll"))
            .await
            .unwrap();
        assert_eq!(reply.body().as_groups().unwrap().len(), 2);

        let original = Group::new("old").with_id("g1");
        let reply = route
            .request(
                Message::new()
                    .with_header(headers::OPERATION, "update")
                    .with_body(Body::Group(original.clone())),
            )
            .await
            .unwrap();
        assert_eq!(service.updated.lock().unwrap()[0], original);
        let returned = reply.body().as_group().unwrap();
        assert_eq!(returned.name, "newName");
        assert_eq!(returned.id.as_deref(), Some("g1"));

        let reply = route
            .request(
                Message::new()
                    .with_header(headers::OPERATION, "delete")
                    .with_header(headers::ID, "g1"),
            )
            .await
            .unwrap();
        assert!(reply.is_fault());
        assert!(reply.body().as_text().unwrap().contains("fail"));

        route.shutdown().await;
    }
}
