// ABOUTME: In-memory control plane for deployment tests.
// ABOUTME: Records every mutating call and replays scripted health and task counts.

use async_trait::async_trait;
use nonempty::NonEmpty;
use parking_lot::Mutex;
use std::collections::{BTreeMap, VecDeque};

use stackswap::control_plane::{
    AttributeUpdate, ClusterError, ClusterMember, ClusterOps, MemberStatus, ResourcePool,
    ScalingError, ScalingOps, ServiceStatus, StackDescription, StackError, StackOps, StackOutputs,
    StackRequest, StackStatus,
};
use stackswap::types::{ClusterName, InstanceId, MemberArn, PoolName, StackName, TaskArn};

/// A mutating call made against the fake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    CreateStack(String),
    UpdateStack(String),
    DeleteStack(String),
    SetDesiredCapacity(String, u32),
    SetAttributes(Vec<String>),
    Drain(Vec<String>),
}

/// A stack as the fake control plane stores it.
#[derive(Debug, Clone)]
pub struct FakeStack {
    pub status: StackStatus,
    pub template: String,
    pub parameters: BTreeMap<String, String>,
    pub tags: BTreeMap<String, String>,
    pub outputs: Vec<(String, String)>,
}

impl FakeStack {
    pub fn new(status: StackStatus) -> Self {
        Self {
            status,
            template: String::new(),
            parameters: BTreeMap::new(),
            tags: BTreeMap::new(),
            outputs: Vec::new(),
        }
    }

    pub fn template(mut self, template: &str) -> Self {
        self.template = template.to_string();
        self
    }

    pub fn parameter(mut self, key: &str, value: &str) -> Self {
        self.parameters.insert(key.to_string(), value.to_string());
        self
    }

    pub fn tag(mut self, key: &str, value: &str) -> Self {
        self.tags.insert(key.to_string(), value.to_string());
        self
    }

    pub fn output(mut self, key: &str, value: &str) -> Self {
        self.outputs.push((key.to_string(), value.to_string()));
        self
    }
}

#[derive(Debug, Clone)]
struct FakePool {
    desired: u32,
    min: u32,
    max: u32,
    instances: Vec<String>,
    /// Healthy counts returned by successive polls; the last one repeats.
    healthy: VecDeque<u32>,
}

#[derive(Default)]
struct State {
    stacks: BTreeMap<String, FakeStack>,
    /// Outputs and final status given to stacks when they are created.
    prepared: BTreeMap<String, FakeStack>,
    pools: BTreeMap<String, FakePool>,
    members: BTreeMap<String, Vec<ClusterMember>>,
    /// Task counts returned by successive polls of a member; the last one repeats.
    tasks: BTreeMap<String, VecDeque<u32>>,
    task_polls: BTreeMap<String, u32>,
    services: BTreeMap<String, Vec<ServiceStatus>>,
    calls: Vec<Call>,
    requests: Vec<StackRequest>,
    reads: u32,
}

/// Control plane double shared by every deployment test.
#[derive(Default)]
pub struct FakeControlPlane {
    state: Mutex<State>,
}

/// Pop the next scripted value, keeping the last one in place.
fn next_scripted(script: &mut VecDeque<u32>) -> Option<u32> {
    if script.len() > 1 {
        script.pop_front()
    } else {
        script.front().copied()
    }
}

impl FakeControlPlane {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stack(self, name: &str, stack: FakeStack) -> Self {
        self.state.lock().stacks.insert(name.to_string(), stack);
        self
    }

    /// What a stack looks like once `create_stack` has run for `name`.
    pub fn prepare_stack(self, name: &str, stack: FakeStack) -> Self {
        self.state.lock().prepared.insert(name.to_string(), stack);
        self
    }

    pub fn with_pool(self, name: &str, desired: u32, min: u32, max: u32, instances: &[&str]) -> Self {
        self.state.lock().pools.insert(
            name.to_string(),
            FakePool {
                desired,
                min,
                max,
                instances: instances.iter().map(|s| s.to_string()).collect(),
                healthy: VecDeque::new(),
            },
        );
        self
    }

    /// Healthy counts reported for `pool`; without a script a pool is
    /// healthy at its desired capacity.
    pub fn script_healthy(self, pool: &str, counts: &[u32]) -> Self {
        if let Some(p) = self.state.lock().pools.get_mut(pool) {
            p.healthy = counts.iter().copied().collect();
        }
        self
    }

    pub fn with_member(self, cluster: &str, arn: &str, instance: &str, status: MemberStatus) -> Self {
        self.state
            .lock()
            .members
            .entry(cluster.to_string())
            .or_default()
            .push(ClusterMember {
                arn: MemberArn::new(arn),
                instance_id: InstanceId::new(instance),
                status,
                attributes: BTreeMap::new(),
                running_tasks: 0,
            });
        self
    }

    /// Task counts reported for `member`; unscripted members have none.
    pub fn script_tasks(self, member: &str, counts: &[u32]) -> Self {
        self.state
            .lock()
            .tasks
            .insert(member.to_string(), counts.iter().copied().collect());
        self
    }

    pub fn with_service(self, cluster: &str, service: ServiceStatus) -> Self {
        self.state
            .lock()
            .services
            .entry(cluster.to_string())
            .or_default()
            .push(service);
        self
    }

    /// Every mutating call, in order.
    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().calls.clone()
    }

    pub fn requests(&self) -> Vec<StackRequest> {
        self.state.lock().requests.clone()
    }

    /// Number of read calls made.
    pub fn reads(&self) -> u32 {
        self.state.lock().reads
    }

    pub fn task_polls(&self, member: &str) -> u32 {
        self.state
            .lock()
            .task_polls
            .get(member)
            .copied()
            .unwrap_or_default()
    }

    pub fn stack_names(&self) -> Vec<String> {
        self.state.lock().stacks.keys().cloned().collect()
    }

    pub fn desired_capacity(&self, pool: &str) -> Option<u32> {
        self.state.lock().pools.get(pool).map(|p| p.desired)
    }

    pub fn member_attributes(&self, cluster: &str, arn: &str) -> BTreeMap<String, String> {
        self.state
            .lock()
            .members
            .get(cluster)
            .and_then(|members| members.iter().find(|m| m.arn.as_str() == arn))
            .map(|m| m.attributes.clone())
            .unwrap_or_default()
    }

    pub fn member_status(&self, cluster: &str, arn: &str) -> Option<MemberStatus> {
        self.state
            .lock()
            .members
            .get(cluster)
            .and_then(|members| members.iter().find(|m| m.arn.as_str() == arn))
            .map(|m| m.status.clone())
    }
}

#[async_trait]
impl StackOps for FakeControlPlane {
    async fn create_stack(&self, request: &StackRequest) -> Result<(), StackError> {
        let mut state = self.state.lock();
        let name = request.name.to_string();
        state.calls.push(Call::CreateStack(name.clone()));
        state.requests.push(request.clone());

        let mut stack = state
            .prepared
            .remove(&name)
            .unwrap_or_else(|| FakeStack::new(StackStatus::CreateComplete));
        stack.template = request.template.clone();
        stack.parameters = request.parameters.clone();
        stack.tags = request.tags.clone();
        state.stacks.insert(name, stack);
        Ok(())
    }

    async fn update_stack(&self, request: &StackRequest) -> Result<(), StackError> {
        let mut state = self.state.lock();
        let name = request.name.to_string();
        state.calls.push(Call::UpdateStack(name.clone()));
        state.requests.push(request.clone());

        let stack = state
            .stacks
            .get_mut(&name)
            .ok_or_else(|| StackError::NotFound(name.clone()))?;
        stack.status = StackStatus::UpdateComplete;
        stack.template = request.template.clone();
        stack.parameters = request.parameters.clone();
        stack.tags = request.tags.clone();
        Ok(())
    }

    async fn delete_stack(&self, name: &StackName) -> Result<(), StackError> {
        let mut state = self.state.lock();
        state.calls.push(Call::DeleteStack(name.to_string()));
        state.stacks.remove(name.as_str());
        Ok(())
    }

    async fn describe_stack(&self, name: &StackName) -> Result<StackDescription, StackError> {
        let mut state = self.state.lock();
        state.reads += 1;
        let stack = state
            .stacks
            .get(name.as_str())
            .ok_or_else(|| StackError::NotFound(name.to_string()))?;
        Ok(StackDescription {
            name: name.clone(),
            status: stack.status.clone(),
            outputs: stack.outputs.iter().cloned().collect(),
            parameters: stack.parameters.clone(),
            tags: stack.tags.clone(),
        })
    }

    async fn get_template(&self, name: &StackName) -> Result<String, StackError> {
        let mut state = self.state.lock();
        state.reads += 1;
        state
            .stacks
            .get(name.as_str())
            .map(|s| s.template.clone())
            .ok_or_else(|| StackError::NotFound(name.to_string()))
    }

    async fn list_all_outputs(&self) -> Result<BTreeMap<String, StackOutputs>, StackError> {
        let mut state = self.state.lock();
        state.reads += 1;
        Ok(state
            .stacks
            .iter()
            .map(|(name, stack)| (name.clone(), stack.outputs.iter().cloned().collect()))
            .collect())
    }
}

#[async_trait]
impl ScalingOps for FakeControlPlane {
    async fn describe_pools(&self, names: &[PoolName]) -> Result<Vec<ResourcePool>, ScalingError> {
        let mut state = self.state.lock();
        state.reads += 1;
        Ok(names
            .iter()
            .filter_map(|name| {
                state.pools.get(name.as_str()).map(|p| ResourcePool {
                    name: name.clone(),
                    desired_capacity: p.desired,
                    min_size: p.min,
                    max_size: p.max,
                    instances: p.instances.iter().map(InstanceId::new).collect(),
                })
            })
            .collect())
    }

    async fn set_desired_capacity(&self, name: &PoolName, capacity: u32) -> Result<(), ScalingError> {
        let mut state = self.state.lock();
        state
            .calls
            .push(Call::SetDesiredCapacity(name.to_string(), capacity));
        let pool = state
            .pools
            .get_mut(name.as_str())
            .ok_or_else(|| ScalingError::NotFound(name.to_string()))?;
        pool.desired = capacity;
        Ok(())
    }

    async fn healthy_count(&self, name: &PoolName) -> Result<u32, ScalingError> {
        let mut state = self.state.lock();
        state.reads += 1;
        let pool = state
            .pools
            .get_mut(name.as_str())
            .ok_or_else(|| ScalingError::NotFound(name.to_string()))?;
        Ok(next_scripted(&mut pool.healthy).unwrap_or(pool.desired))
    }
}

#[async_trait]
impl ClusterOps for FakeControlPlane {
    async fn list_members(&self, cluster: &ClusterName) -> Result<Vec<ClusterMember>, ClusterError> {
        let mut state = self.state.lock();
        state.reads += 1;
        Ok(state
            .members
            .get(cluster.as_str())
            .cloned()
            .unwrap_or_default())
    }

    async fn set_attributes(
        &self,
        cluster: &ClusterName,
        updates: &NonEmpty<AttributeUpdate>,
    ) -> Result<(), ClusterError> {
        let mut state = self.state.lock();
        state.calls.push(Call::SetAttributes(
            updates.iter().map(|u| u.member.to_string()).collect(),
        ));
        let members = state
            .members
            .get_mut(cluster.as_str())
            .ok_or_else(|| ClusterError::NotFound(cluster.to_string()))?;
        for update in updates.iter() {
            if let Some(member) = members.iter_mut().find(|m| m.arn == update.member) {
                member
                    .attributes
                    .insert(update.key.clone(), update.value.clone());
            }
        }
        Ok(())
    }

    async fn drain(
        &self,
        cluster: &ClusterName,
        members: &NonEmpty<MemberArn>,
    ) -> Result<(), ClusterError> {
        let mut state = self.state.lock();
        state
            .calls
            .push(Call::Drain(members.iter().map(|m| m.to_string()).collect()));
        let registered = state
            .members
            .get_mut(cluster.as_str())
            .ok_or_else(|| ClusterError::NotFound(cluster.to_string()))?;
        for member in registered.iter_mut() {
            if members.iter().any(|arn| arn == &member.arn) {
                member.status = MemberStatus::Draining;
            }
        }
        Ok(())
    }

    async fn tasks_on(
        &self,
        _cluster: &ClusterName,
        member: &MemberArn,
    ) -> Result<Vec<TaskArn>, ClusterError> {
        let mut state = self.state.lock();
        state.reads += 1;
        *state.task_polls.entry(member.to_string()).or_default() += 1;
        let count = state
            .tasks
            .get_mut(member.as_str())
            .and_then(next_scripted)
            .unwrap_or_default();
        Ok((0..count)
            .map(|i| TaskArn::new(format!("{member}/task-{i}")))
            .collect())
    }

    async fn list_services(&self, cluster: &ClusterName) -> Result<Vec<ServiceStatus>, ClusterError> {
        let mut state = self.state.lock();
        state.reads += 1;
        Ok(state
            .services
            .get(cluster.as_str())
            .cloned()
            .unwrap_or_default())
    }
}
