//! EPAM Cloud compute operations.
//!
//! Thin wrappers over [`MaestroClient`]: each one assembles the form
//! parameters for its action, picks the envelope shape to decode, and
//! unwraps the records. Project, region, image and shape come from the
//! client's [`Placement`].

use crate::action::{Action, InstanceAction};
use crate::client::{self, FormParams, MaestroClient};
use crate::config::{EpcConfig, Placement};
use crate::envelope::{
    CreateKeyPairStatus, DescribeImagesStatus, DescribeInstancesStatus, DescribeKeyPairsStatus,
    DescribeProjectsStatus, DescribeRegionsStatus, DescribeShapesStatus, Envelope,
    RunInstancesStatus,
};
use crate::error::EpcResult;
use crate::types::{Image, Instance, Key, Project, Region, Shape};

/// Compute client bound to one placement.
#[derive(Debug, Clone)]
pub struct ComputeClient {
    client: MaestroClient,
    placement: Placement,
}

impl ComputeClient {
    pub fn new(client: MaestroClient, placement: Placement) -> Self {
        Self { client, placement }
    }

    /// Build the transport and the compute client from one configuration.
    pub fn from_config(config: &EpcConfig) -> EpcResult<Self> {
        let client = MaestroClient::new(config)?;
        Ok(Self::new(client, config.placement.clone()))
    }

    pub fn placement(&self) -> &Placement {
        &self.placement
    }

    pub fn transport(&self) -> &MaestroClient {
        &self.client
    }

    /// Reachability probe: one signed POST without parameters. Succeeds when
    /// the endpoint answered at all, whatever it answered.
    pub async fn check_api(&self) -> EpcResult<()> {
        self.client.call(&FormParams::new()).await?;
        Ok(())
    }

    // ── Instances ───────────────────────────────────────────────────

    /// Launch an instance from the placement's image and shape, installing
    /// key pair `key_name`.
    pub async fn create_instance(&self, key_name: &str) -> EpcResult<Instance> {
        let mut params = client::build_params(Action::RunInstances);
        set(&mut params, "project", &self.placement.project);
        set(&mut params, "region", &self.placement.region);
        set(&mut params, "shape", &self.placement.shape);
        set(&mut params, "imageId", &self.placement.image);
        set(&mut params, "key-name", key_name);

        let env: RunInstancesStatus = self.client.invoke(&params, true).await?;
        Ok(env.into_payload().into_instance())
    }

    /// Look up one instance. An empty id yields an empty record without
    /// contacting the server.
    pub async fn get_instance(&self, instance_id: &str) -> EpcResult<Instance> {
        if instance_id.is_empty() {
            return Ok(Instance::default());
        }

        let mut params = client::build_params(Action::DescribeInstances);
        set(&mut params, "project", &self.placement.project);
        set(&mut params, "instances", instance_id);

        let env: DescribeInstancesStatus = self.client.invoke(&params, true).await?;
        Ok(env.into_payload().into_instance())
    }

    /// Start, stop, reboot or remove an instance. `force` is sent as
    /// `force=1` (hard stop / kill).
    ///
    /// The reply body is not inspected; only reaching the endpoint counts.
    pub async fn instance_action(
        &self,
        instance_id: &str,
        action: InstanceAction,
        force: bool,
    ) -> EpcResult<()> {
        let mut params = client::build_params(action.action());
        set(&mut params, "project", &self.placement.project);
        set(&mut params, "region", &self.placement.region);
        set(&mut params, "instances", instance_id);
        if force {
            set(&mut params, "force", "1");
        }

        self.client
            .call(&params)
            .await
            .map_err(|e| e.with_action(action.action().as_str()))?;
        log::debug!("{} requested for instance {}", action, instance_id);
        Ok(())
    }

    pub async fn start_instance(&self, instance_id: &str) -> EpcResult<()> {
        self.instance_action(instance_id, InstanceAction::Start, false).await
    }

    pub async fn stop_instance(&self, instance_id: &str, force: bool) -> EpcResult<()> {
        self.instance_action(instance_id, InstanceAction::Stop, force).await
    }

    pub async fn reboot_instance(&self, instance_id: &str) -> EpcResult<()> {
        self.instance_action(instance_id, InstanceAction::Reboot, false).await
    }

    pub async fn remove_instance(&self, instance_id: &str, force: bool) -> EpcResult<()> {
        self.instance_action(instance_id, InstanceAction::Remove, force).await
    }

    // ── Key pairs ───────────────────────────────────────────────────

    fn key_pair_params(&self, action: Action, key_name: &str) -> FormParams {
        let mut params = client::build_params(action);
        set(&mut params, "project", &self.placement.project);
        set(&mut params, "region", &self.placement.region);
        set(&mut params, "key-name", key_name);
        params
    }

    /// Create a key pair. The returned key holds the private half, which the
    /// server does not keep.
    pub async fn create_key_pair(&self, key_name: &str) -> EpcResult<Key> {
        let params = self.key_pair_params(Action::CreateKeyPair, key_name);
        let env: CreateKeyPairStatus = self.client.invoke(&params, true).await?;
        Ok(env.into_payload().into_key())
    }

    /// Look up a key pair. A missing key is an empty [`Key`], not an error.
    pub async fn describe_key_pair(&self, key_name: &str) -> EpcResult<Key> {
        let params = self.key_pair_params(Action::DescribeKeyPairs, key_name);
        let env: DescribeKeyPairsStatus = self.client.invoke(&params, false).await?;
        if !env.is_success() {
            log::debug!(
                "key pair {} lookup returned {}: {}",
                key_name,
                env.status_code(),
                env.status_message()
            );
        }
        Ok(env.into_payload().into_key())
    }

    pub async fn delete_key_pair(&self, key_name: &str) -> EpcResult<Key> {
        let params = self.key_pair_params(Action::DeleteKeyPair, key_name);
        let env: CreateKeyPairStatus = self.client.invoke(&params, true).await?;
        Ok(env.into_payload().into_key())
    }

    // ── Catalogue ───────────────────────────────────────────────────

    /// Images available in the placement's project and region.
    pub async fn images(&self) -> EpcResult<Vec<Image>> {
        let mut params = client::build_params(Action::DescribeImages);
        set(&mut params, "project", &self.placement.project);
        set(&mut params, "region", &self.placement.region);

        let env: DescribeImagesStatus = self.client.invoke(&params, true).await?;
        Ok(env.into_payload().images)
    }

    /// Instance shapes available in the placement's project and region.
    pub async fn shapes(&self) -> EpcResult<Vec<Shape>> {
        let mut params = client::build_params(Action::DescribeShapes);
        set(&mut params, "project", &self.placement.project);
        set(&mut params, "region", &self.placement.region);

        let env: DescribeShapesStatus = self.client.invoke(&params, true).await?;
        Ok(env.into_payload().shapes)
    }

    /// Projects visible to the access id.
    pub async fn projects(&self) -> EpcResult<Vec<Project>> {
        let params = client::build_params(Action::DescribeProjects);
        let env: DescribeProjectsStatus = self.client.invoke(&params, true).await?;
        Ok(env.into_payload().projects)
    }

    /// Regions the placement's project can use.
    pub async fn regions(&self) -> EpcResult<Vec<Region>> {
        let mut params = client::build_params(Action::DescribeRegions);
        set(&mut params, "project", &self.placement.project);

        let env: DescribeRegionsStatus = self.client.invoke(&params, true).await?;
        Ok(env.into_payload().regions)
    }
}

fn set(params: &mut FormParams, key: &str, value: &str) {
    params.insert(key.to_string(), value.to_string());
}
