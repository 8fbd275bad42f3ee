//! In-memory stand-ins for the AWS services, recording every call in order

use crate::cloud::{BucketApi, StackApi, TableCatalogApi};
use crate::error::CloudError;
use crate::model::{DeleteOutcome, ObjectRef, Stack, StackResource, TableBucketArn};
use crate::prompt::Confirm;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    DescribeStack(String),
    ListStacks,
    ListStackResources(String),
    DeleteStack(String),
    ListObjects(String),
    GetBucketVersioning(String),
    ListObjectVersions(String),
    DeleteObjects(String, Vec<ObjectRef>),
    ListNamespaces(String),
    ListTables(String, String),
    DeleteTable(String, String, String),
    DeleteNamespace(String, String),
}

impl Call {
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Call::DeleteStack(_)
                | Call::DeleteObjects(..)
                | Call::DeleteTable(..)
                | Call::DeleteNamespace(..)
        )
    }
}

struct FakeStack {
    stack: Stack,
    resources: Vec<StackResource>,
    /// DescribeStacks calls answered with DELETE_IN_PROGRESS before the stack disappears
    describes_until_gone: Option<u32>,
}

#[derive(Default)]
struct FakeBucket {
    objects: Vec<String>,
    versions: Vec<(String, String)>,
    versioned: bool,
}

#[derive(Default)]
struct State {
    stacks: Vec<FakeStack>,
    buckets: HashMap<String, FakeBucket>,
    /// table bucket ARN -> (namespace, tables), in insertion order
    table_buckets: HashMap<String, Vec<(String, Vec<String>)>>,
    calls: Vec<Call>,
}

#[derive(Default)]
pub struct FakeCloud {
    state: Mutex<State>,
    failing: HashSet<&'static str>,
    lingering_tables: bool,
    stuck_deletes: bool,
}

impl FakeCloud {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stack(self, name: &str, status: &str, resources: Vec<StackResource>) -> Self {
        self.state.lock().unwrap().stacks.push(FakeStack {
            stack: Stack::new(name, status),
            resources,
            describes_until_gone: None,
        });
        self
    }

    /// A bucket is versioned when it has any versions
    pub fn with_bucket(self, name: &str, keys: &[&str], versions: &[(&str, &str)]) -> Self {
        self.state.lock().unwrap().buckets.insert(
            name.to_string(),
            FakeBucket {
                objects: keys.iter().map(|k| k.to_string()).collect(),
                versions: versions
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
                versioned: !versions.is_empty(),
            },
        );
        self
    }

    pub fn with_table_bucket(self, arn: &str, namespaces: &[(&str, &[&str])]) -> Self {
        let namespaces = namespaces
            .iter()
            .map(|(ns, tables)| {
                (
                    ns.to_string(),
                    tables.iter().map(|t| t.to_string()).collect(),
                )
            })
            .collect();
        self.state
            .lock()
            .unwrap()
            .table_buckets
            .insert(arn.to_string(), namespaces);
        self
    }

    /// Make every call of this operation fail
    pub fn failing(mut self, operation: &'static str) -> Self {
        self.failing.insert(operation);
        self
    }

    /// DeleteTable succeeds but the tables keep showing up in ListTables
    pub fn with_lingering_tables(mut self) -> Self {
        self.lingering_tables = true;
        self
    }

    /// Deleted stacks stay in DELETE_IN_PROGRESS forever
    pub fn with_stuck_deletes(mut self) -> Self {
        self.stuck_deletes = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Every DeleteObjects request against `bucket`, in order
    pub fn object_deletes(&self, bucket: &str) -> Vec<(String, Vec<ObjectRef>)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::DeleteObjects(b, objects) if b == bucket => Some((b, objects)),
                _ => None,
            })
            .collect()
    }

    fn record(&self, operation: &'static str, call: Call) -> Result<(), CloudError> {
        self.state.lock().unwrap().calls.push(call);
        if self.failing.contains(operation) {
            return Err(CloudError::new(operation, "injected failure").with_code("InternalError"));
        }
        Ok(())
    }
}

#[async_trait]
impl StackApi for FakeCloud {
    async fn describe_stack(&self, name: &str) -> Result<Option<Stack>, CloudError> {
        self.record("DescribeStacks", Call::DescribeStack(name.to_string()))?;
        let mut state = self.state.lock().unwrap();
        let Some(index) = state.stacks.iter().position(|s| s.stack.name == name) else {
            return Ok(None);
        };

        match state.stacks[index].describes_until_gone {
            Some(0) => {
                state.stacks.remove(index);
                Ok(None)
            }
            Some(remaining) => {
                if !self.stuck_deletes {
                    state.stacks[index].describes_until_gone = Some(remaining - 1);
                }
                Ok(Some(state.stacks[index].stack.clone()))
            }
            None => Ok(Some(state.stacks[index].stack.clone())),
        }
    }

    async fn list_stacks(&self) -> Result<Vec<Stack>, CloudError> {
        self.record("ListStacks", Call::ListStacks)?;
        let state = self.state.lock().unwrap();
        Ok(state.stacks.iter().map(|s| s.stack.clone()).collect())
    }

    async fn list_stack_resources(&self, stack: &str) -> Result<Vec<StackResource>, CloudError> {
        self.record(
            "ListStackResources",
            Call::ListStackResources(stack.to_string()),
        )?;
        let state = self.state.lock().unwrap();
        state
            .stacks
            .iter()
            .find(|s| s.stack.name == stack)
            .map(|s| s.resources.clone())
            .ok_or_else(|| {
                CloudError::new("ListStackResources", format!("Stack {} does not exist", stack))
                    .with_code("ValidationError")
            })
    }

    async fn delete_stack(&self, stack: &str) -> Result<(), CloudError> {
        self.record("DeleteStack", Call::DeleteStack(stack.to_string()))?;
        let mut state = self.state.lock().unwrap();
        if let Some(entry) = state.stacks.iter_mut().find(|s| s.stack.name == stack) {
            entry.stack.status = "DELETE_IN_PROGRESS".to_string();
            entry.describes_until_gone = Some(1);
        }
        Ok(())
    }
}

#[async_trait]
impl BucketApi for FakeCloud {
    async fn list_objects(&self, bucket: &str) -> Result<Vec<ObjectRef>, CloudError> {
        self.record("ListObjectsV2", Call::ListObjects(bucket.to_string()))?;
        let state = self.state.lock().unwrap();
        let fake = state.buckets.get(bucket).ok_or_else(|| {
            CloudError::new("ListObjectsV2", "The specified bucket does not exist")
                .with_code("NoSuchBucket")
        })?;
        Ok(fake.objects.iter().map(ObjectRef::current).collect())
    }

    async fn is_versioned(&self, bucket: &str) -> Result<bool, CloudError> {
        self.record(
            "GetBucketVersioning",
            Call::GetBucketVersioning(bucket.to_string()),
        )?;
        let state = self.state.lock().unwrap();
        Ok(state.buckets.get(bucket).is_some_and(|b| b.versioned))
    }

    async fn list_object_versions(&self, bucket: &str) -> Result<Vec<ObjectRef>, CloudError> {
        self.record(
            "ListObjectVersions",
            Call::ListObjectVersions(bucket.to_string()),
        )?;
        let state = self.state.lock().unwrap();
        Ok(state
            .buckets
            .get(bucket)
            .map(|b| {
                b.versions
                    .iter()
                    .map(|(k, v)| ObjectRef::versioned(k, v))
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn delete_objects(
        &self,
        bucket: &str,
        objects: Vec<ObjectRef>,
    ) -> Result<DeleteOutcome, CloudError> {
        self.record(
            "DeleteObjects",
            Call::DeleteObjects(bucket.to_string(), objects.clone()),
        )?;
        let mut state = self.state.lock().unwrap();
        if let Some(fake) = state.buckets.get_mut(bucket) {
            for object in &objects {
                match &object.version_id {
                    Some(version) => fake
                        .versions
                        .retain(|(k, v)| !(k == &object.key && v == version)),
                    None => fake.objects.retain(|k| k != &object.key),
                }
            }
        }
        Ok(DeleteOutcome {
            deleted: objects.len(),
            failed: Vec::new(),
        })
    }
}

#[async_trait]
impl TableCatalogApi for FakeCloud {
    async fn list_namespaces(&self, bucket: &TableBucketArn) -> Result<Vec<String>, CloudError> {
        self.record(
            "ListNamespaces",
            Call::ListNamespaces(bucket.as_str().to_string()),
        )?;
        let state = self.state.lock().unwrap();
        Ok(state
            .table_buckets
            .get(bucket.as_str())
            .map(|namespaces| namespaces.iter().map(|(ns, _)| ns.clone()).collect())
            .unwrap_or_default())
    }

    async fn list_tables(
        &self,
        bucket: &TableBucketArn,
        namespace: &str,
    ) -> Result<Vec<String>, CloudError> {
        self.record(
            "ListTables",
            Call::ListTables(bucket.as_str().to_string(), namespace.to_string()),
        )?;
        let state = self.state.lock().unwrap();
        Ok(state
            .table_buckets
            .get(bucket.as_str())
            .and_then(|namespaces| namespaces.iter().find(|(ns, _)| ns == namespace))
            .map(|(_, tables)| tables.clone())
            .unwrap_or_default())
    }

    async fn delete_table(
        &self,
        bucket: &TableBucketArn,
        namespace: &str,
        table: &str,
    ) -> Result<(), CloudError> {
        self.record(
            "DeleteTable",
            Call::DeleteTable(
                bucket.as_str().to_string(),
                namespace.to_string(),
                table.to_string(),
            ),
        )?;
        if self.lingering_tables {
            return Ok(());
        }
        let mut state = self.state.lock().unwrap();
        if let Some(namespaces) = state.table_buckets.get_mut(bucket.as_str()) {
            for (ns, tables) in namespaces.iter_mut() {
                if ns == namespace {
                    tables.retain(|t| t != table);
                }
            }
        }
        Ok(())
    }

    async fn delete_namespace(
        &self,
        bucket: &TableBucketArn,
        namespace: &str,
    ) -> Result<(), CloudError> {
        self.record(
            "DeleteNamespace",
            Call::DeleteNamespace(bucket.as_str().to_string(), namespace.to_string()),
        )?;
        let mut state = self.state.lock().unwrap();
        if let Some(namespaces) = state.table_buckets.get_mut(bucket.as_str()) {
            if namespaces
                .iter()
                .any(|(ns, tables)| ns == namespace && !tables.is_empty())
            {
                return Err(
                    CloudError::new("DeleteNamespace", "The namespace is not empty")
                        .with_code("ConflictException"),
                );
            }
            namespaces.retain(|(ns, _)| ns != namespace);
        }
        Ok(())
    }
}

/// Answers prompts from a script and remembers what was asked
#[derive(Default)]
pub struct ScriptedConfirm {
    answers: Mutex<VecDeque<bool>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedConfirm {
    pub fn answering(answers: &[bool]) -> Self {
        Self {
            answers: Mutex::new(answers.iter().copied().collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl Confirm for ScriptedConfirm {
    fn confirm(&self, prompt: &str) -> anyhow::Result<bool> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("not a terminal"))
    }
}
