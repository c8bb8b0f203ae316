//! # SNMP 采集能力模块
//!
//! 提供面向管理设备的 SNMP 数据采集能力，支持：
//! - **OID 编译**：点分十进制字符串 → 数值路径
//! - **三种解码策略**：原始值 / 十六进制字节串 / 点分整数序列
//! - **批量请求**：单会话并发执行多条描述符（读 fail-fast、写逐键收集）
//! - **表投影**：接口表 / 硬件表 / 路由表 / ARP 表的类型化输出
//!
//! ## 架构设计
//!
//! ```text
//! RequestDescriptor (path + key + mode + decode)
//!       │
//!       ▼
//! SnmpClient ──► SnmpTransport::open ──► SnmpSession (snmp2 AsyncSession)
//!       │                                    get / walk / set
//!       ▼
//! codec::decode ──► DecodedValue (Scalar | Table)
//!       │
//!       ▼
//! projection::* ──► 类型化记录（InterfaceEntry、RouteEntry ...）
//! ```
//!
//! 读批量与写批量的失败语义不同：读请求任一 key 失败即整体失败；
//! 写请求逐键收集成功/失败结果，不因个别 key 失败而放弃其余写入。

mod client;
mod codec;
mod error;
mod oid;
mod projection;
mod transport;

pub use client::{SnmpClient, WriteDescriptor, WriteOutcome};
pub use codec::{decode, DecodeKind, DecodedValue, FetchMode, RequestDescriptor, SnmpScalar};
pub use error::SnmpError;
pub use oid::OidPath;
pub use projection::*;
pub use transport::{SetValue, Snmp2cTransport, SnmpConfig, SnmpSession, SnmpTransport};
