//! 内存版 GroupService
//!
//! 不依赖真实 Keystone 的完整实现：用于 CLI 本地运行与单元测试，支持注入失败场景。

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use contracts::{ActionResponse, Group};
use tracing::{debug, instrument};

use crate::client::GroupService;
use crate::error::{IdentityClientError, Result};

/// 内存服务配置（可注入失败场景）
#[derive(Debug, Default, Clone)]
pub struct InMemoryConfig {
    /// 模拟服务不可达：所有调用返回 `Unavailable`
    pub unavailable: bool,
    /// create 时应该失败的 group 名称
    pub fail_creates: Vec<String>,
    /// delete 时应该返回失败响应的 group IDs
    pub fail_deletes: Vec<String>,
}

#[derive(Debug, Default)]
struct Directory {
    /// group_id -> group
    groups: BTreeMap<String, Group>,
    /// group_id -> user ids
    members: HashMap<String, BTreeSet<String>>,
}

impl Directory {
    fn name_taken(&self, group: &Group, except_id: Option<&str>) -> bool {
        self.groups.values().any(|existing| {
            existing.name == group.name
                && existing.domain_id == group.domain_id
                && existing.id.as_deref() != except_id
        })
    }
}

/// 内存 Keystone group 目录
pub struct InMemoryGroupService {
    config: InMemoryConfig,
    /// Group ID 计数器
    next_id: AtomicU64,
    directory: Mutex<Directory>,
}

impl InMemoryGroupService {
    /// 创建空目录
    pub fn new() -> Self {
        Self::with_config(InMemoryConfig::default())
    }

    /// 使用配置创建
    pub fn with_config(config: InMemoryConfig) -> Self {
        Self {
            config,
            next_id: AtomicU64::new(1),
            directory: Mutex::new(Directory::default()),
        }
    }

    /// 预置 groups（配置文件中的 `[[directory.groups]]`）
    ///
    /// 返回带有分配 ID 的 groups，顺序与输入一致。
    pub fn seed(&self, groups: impl IntoIterator<Item = Group>) -> Result<Vec<Group>> {
        groups
            .into_iter()
            .map(|group| self.insert(&group))
            .collect()
    }

    /// 当前 group 数量
    pub fn group_count(&self) -> usize {
        self.directory().map(|d| d.groups.len()).unwrap_or(0)
    }

    fn allocate_id(&self) -> String {
        format!("grp-{:06}", self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    fn directory(&self) -> Result<MutexGuard<'_, Directory>> {
        self.directory
            .lock()
            .map_err(|_| IdentityClientError::unavailable("directory lock poisoned"))
    }

    fn ensure_available(&self) -> Result<()> {
        if self.config.unavailable {
            Err(IdentityClientError::unavailable("connection refused"))
        } else {
            Ok(())
        }
    }

    fn insert(&self, group: &Group) -> Result<Group> {
        if group.name.trim().is_empty() {
            return Err(IdentityClientError::invalid_request("group name is required"));
        }

        let mut directory = self.directory()?;
        if directory.name_taken(group, None) {
            return Err(IdentityClientError::conflict(
                &group.name,
                group.domain_id.as_deref().unwrap_or("-"),
            ));
        }

        let mut stored = group.clone();
        let id = self.allocate_id();
        stored.id = Some(id.clone());
        directory.groups.insert(id, stored.clone());
        Ok(stored)
    }

    fn missing_group(group_id: &str) -> ActionResponse {
        ActionResponse::failed(format!("Could not find group {group_id}"), 404)
    }
}

impl Default for InMemoryGroupService {
    fn default() -> Self {
        Self::new()
    }
}

impl GroupService for InMemoryGroupService {
    #[instrument(name = "in_memory_group_create", skip(self, group), fields(name = %group.name))]
    async fn create(&self, group: &Group) -> Result<Group> {
        self.ensure_available()?;

        if self.config.fail_creates.contains(&group.name) {
            return Err(IdentityClientError::unavailable("mock failure"));
        }

        let stored = self.insert(group)?;
        debug!(group_id = ?stored.id, "group created");
        Ok(stored)
    }

    #[instrument(name = "in_memory_group_get", skip(self))]
    async fn get(&self, group_id: &str) -> Result<Option<Group>> {
        self.ensure_available()?;
        Ok(self.directory()?.groups.get(group_id).cloned())
    }

    #[instrument(name = "in_memory_group_list", skip(self))]
    async fn list(&self) -> Result<Vec<Group>> {
        self.ensure_available()?;
        Ok(self.directory()?.groups.values().cloned().collect())
    }

    #[instrument(name = "in_memory_group_update", skip(self, group), fields(group_id = ?group.id))]
    async fn update(&self, group: &Group) -> Result<Group> {
        self.ensure_available()?;

        let group_id = group
            .id
            .as_deref()
            .ok_or_else(|| IdentityClientError::invalid_request("group id is required"))?;

        let mut directory = self.directory()?;
        if !directory.groups.contains_key(group_id) {
            return Err(IdentityClientError::not_found(group_id));
        }
        if directory.name_taken(group, Some(group_id)) {
            return Err(IdentityClientError::conflict(
                &group.name,
                group.domain_id.as_deref().unwrap_or("-"),
            ));
        }

        directory
            .groups
            .insert(group_id.to_string(), group.clone());
        Ok(group.clone())
    }

    #[instrument(name = "in_memory_group_delete", skip(self))]
    async fn delete(&self, group_id: &str) -> Result<ActionResponse> {
        self.ensure_available()?;

        if self.config.fail_deletes.iter().any(|id| id == group_id) {
            return Ok(ActionResponse::failed("mock failure", 500));
        }

        let mut directory = self.directory()?;
        if directory.groups.remove(group_id).is_none() {
            return Ok(Self::missing_group(group_id));
        }
        directory.members.remove(group_id);
        Ok(ActionResponse::success())
    }

    #[instrument(name = "in_memory_group_add_user", skip(self))]
    async fn add_user_to_group(&self, group_id: &str, user_id: &str) -> Result<ActionResponse> {
        self.ensure_available()?;

        let mut directory = self.directory()?;
        if !directory.groups.contains_key(group_id) {
            return Ok(Self::missing_group(group_id));
        }
        // 幂等：重复添加也返回成功
        directory
            .members
            .entry(group_id.to_string())
            .or_default()
            .insert(user_id.to_string());
        Ok(ActionResponse::success())
    }

    #[instrument(name = "in_memory_group_check_user", skip(self))]
    async fn check_group_user(&self, group_id: &str, user_id: &str) -> Result<bool> {
        self.ensure_available()?;

        let directory = self.directory()?;
        Ok(directory
            .members
            .get(group_id)
            .is_some_and(|users| users.contains(user_id)))
    }

    #[instrument(name = "in_memory_group_remove_user", skip(self))]
    async fn remove_user_from_group(
        &self,
        group_id: &str,
        user_id: &str,
    ) -> Result<ActionResponse> {
        self.ensure_available()?;

        let mut directory = self.directory()?;
        if !directory.groups.contains_key(group_id) {
            return Ok(Self::missing_group(group_id));
        }
        let removed = directory
            .members
            .get_mut(group_id)
            .is_some_and(|users| users.remove(user_id));
        if removed {
            Ok(ActionResponse::success())
        } else {
            Ok(ActionResponse::failed(
                format!("User {user_id} is not a member of group {group_id}"),
                404,
            ))
        }
    }
}
