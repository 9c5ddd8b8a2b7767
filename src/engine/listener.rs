//! TCP listener engine.
//!
//! # Responsibilities
//! - Bind the ADS/TCP listener when the engine is constructed
//! - Keep the static route table (unique route names)
//! - Accept connections until cancelled, reporting status transitions
//!
//! ADS framing and packet forwarding are not implemented here: accepted
//! connections are logged and closed.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::net::SocketAddr;

use async_trait::async_trait;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::engine::status::{RouterStatus, StatusReporter};
use crate::engine::{EngineError, EngineFactory, EngineParams, RouterEngine};
use crate::routing::Route;

/// Factory for [`TcpRouterEngine`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpEngineFactory;

impl EngineFactory for TcpEngineFactory {
    type Engine = TcpRouterEngine;

    fn construct(
        &self,
        params: EngineParams,
        status: StatusReporter,
    ) -> Result<Self::Engine, EngineError> {
        TcpRouterEngine::bind(params, status)
    }
}

/// Router engine that owns the ADS/TCP listening socket and route table.
#[derive(Debug)]
pub struct TcpRouterEngine {
    params: EngineParams,
    local_addr: SocketAddr,
    /// Taken by `start`; `None` once the engine has run.
    listener: Option<std::net::TcpListener>,
    routes: HashMap<String, Route>,
    status: StatusReporter,
}

impl TcpRouterEngine {
    /// Bind the listener. Fails if the port is taken or not permitted.
    pub fn bind(params: EngineParams, status: StatusReporter) -> Result<Self, EngineError> {
        let addr = SocketAddr::new(params.bind_address, params.local_port);
        let bind_err = |source| EngineError::Bind {
            addr: addr.to_string(),
            source,
        };

        let listener = std::net::TcpListener::bind(addr).map_err(bind_err)?;
        listener.set_nonblocking(true).map_err(bind_err)?;
        let local_addr = listener.local_addr().map_err(bind_err)?;

        tracing::info!(
            address = %local_addr,
            net_id = %params.local_address,
            remote_port = params.remote_port,
            "Router listener bound"
        );

        Ok(Self {
            params,
            local_addr,
            listener: Some(listener),
            routes: HashMap::new(),
            status,
        })
    }

    /// Address the listener is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn routes(&self) -> impl Iterator<Item = &Route> {
        self.routes.values()
    }

    fn fault(&self, message: String) -> EngineError {
        tracing::error!(address = %self.local_addr, error = %message, "Router listener failed");
        self.status.report(RouterStatus::Faulted, Some(message.clone()));
        EngineError::Fault(message)
    }
}

#[async_trait]
impl RouterEngine for TcpRouterEngine {
    fn add_route(&mut self, route: &Route) -> Result<(), EngineError> {
        if self.routes.contains_key(&route.name) {
            return Err(EngineError::DuplicateRoute(route.name.clone()));
        }
        if route.remote_address == self.params.local_address {
            return Err(EngineError::RouteRejected {
                name: route.name.clone(),
                reason: "remote address is the local router".to_string(),
            });
        }

        tracing::info!(
            route = %route.name,
            remote_address = %route.remote_address,
            remote_ip = %route.remote_ip,
            resolved = route.resolved,
            "Route added"
        );
        self.routes.insert(route.name.clone(), route.clone());
        Ok(())
    }

    async fn start(&mut self, cancel: CancellationToken) -> Result<(), EngineError> {
        let std_listener = self
            .listener
            .take()
            .ok_or_else(|| EngineError::Fault("engine already started".to_string()))?;
        let listener = TcpListener::from_std(std_listener).map_err(|e| self.fault(e.to_string()))?;

        self.status.report(
            RouterStatus::Running,
            Some(format!("listening on {}", self.local_addr)),
        );

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                accepted = listener.accept() => match accepted {
                    Ok((stream, peer_addr)) => {
                        tracing::debug!(peer_addr = %peer_addr, "Connection accepted, closing");
                        drop(stream);
                    }
                    Err(e) if matches!(
                        e.kind(),
                        ErrorKind::ConnectionAborted | ErrorKind::ConnectionReset | ErrorKind::Interrupted
                    ) => {
                        tracing::warn!(error = %e, "Transient accept error");
                    }
                    Err(e) => return Err(self.fault(e.to_string())),
                }
            }
        }

        self.status.report(RouterStatus::Stopping, None);
        drop(listener);
        tracing::info!(address = %self.local_addr, "Router listener closed");
        self.status.report(RouterStatus::Stopped, None);
        Ok(())
    }
}
