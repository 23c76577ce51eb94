// ==========================================
// SpaceNet 货运清单引擎 - 领域模型层
// ==========================================
// 职责: 定义补给网络、资源需求、容器、运载器、装载事件
// 红线: 不含打包 / 装载决策逻辑（归引擎层）
// ==========================================

pub mod capacity;
pub mod carrier;
pub mod container;
pub mod container_factory;
pub mod event;
pub mod network;
pub mod resource;
pub mod types;

// 重导出核心类型
pub use capacity::CargoCapacity;
pub use carrier::{Carrier, CarrierId, CarrierRegistry};
pub use container::{ContainerArchetype, ContainerId, ContentEntry, Placement, ResourceContainer};
pub use container_factory::ContainerFactory;
pub use event::ManifestEvent;
pub use network::{Node, NodeId, SupplyEdge, SupplyEdgeId, SupplyPoint, TransportLeg};
pub use resource::{Demand, DemandId, DemandSet, FragmentId, Resource, ResourceId};
pub use types::{ClassOfSupply, Environment, NodeType};
