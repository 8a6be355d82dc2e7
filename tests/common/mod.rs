//! Common test utilities for retriever integration tests.
//!
//! Provides scripted client factories so fetches run without AWS.

#![allow(dead_code)]

use async_trait::async_trait;
use secret_retriever::secrets::{
    ClientFactory, FetchFailure, GetSecretValueRequest, LogSink, MemoryLogSink, SecretRetriever,
    SecretValue, SecretsError, SecretsManagerApi, StaticRegionProvider,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// How the scripted remote call behaves.
#[derive(Debug, Clone)]
pub enum RemoteBehavior {
    Succeed(&'static str),
    Fail(FetchFailure),
    /// Never completes; only the fetch context can end the call.
    Hang,
    /// Completes successfully after a delay.
    Delay(Duration, &'static str),
}

#[derive(Debug)]
struct ScriptedClient {
    behavior: RemoteBehavior,
    requests: Arc<Mutex<Vec<GetSecretValueRequest>>>,
}

#[async_trait]
impl SecretsManagerApi for ScriptedClient {
    async fn get_secret_value(
        &self,
        request: &GetSecretValueRequest,
    ) -> Result<SecretValue, FetchFailure> {
        self.requests.lock().unwrap().push(request.clone());

        match &self.behavior {
            RemoteBehavior::Succeed(secret) => {
                Ok(SecretValue::from_string(*secret).with_name(request.secret_id()))
            }
            RemoteBehavior::Fail(failure) => Err(failure.clone()),
            RemoteBehavior::Hang => std::future::pending().await,
            RemoteBehavior::Delay(delay, secret) => {
                tokio::time::sleep(*delay).await;
                Ok(SecretValue::from_string(*secret))
            }
        }
    }
}

/// Client factory whose configuration load either fails or yields a scripted client.
#[derive(Debug)]
pub struct ScriptedFactory {
    config_error: Option<&'static str>,
    behavior: RemoteBehavior,
    pub clients_built: AtomicUsize,
    pub requests: Arc<Mutex<Vec<GetSecretValueRequest>>>,
}

impl ScriptedFactory {
    pub fn remote(behavior: RemoteBehavior) -> Arc<Self> {
        Arc::new(Self {
            config_error: None,
            behavior,
            clients_built: AtomicUsize::new(0),
            requests: Arc::default(),
        })
    }

    pub fn config_fails(message: &'static str) -> Arc<Self> {
        Arc::new(Self {
            config_error: Some(message),
            behavior: RemoteBehavior::Succeed("unused"),
            clients_built: AtomicUsize::new(0),
            requests: Arc::default(),
        })
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn clients_built(&self) -> usize {
        self.clients_built.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ClientFactory for ScriptedFactory {
    async fn create_client(
        &self,
        _region: &str,
    ) -> Result<Box<dyn SecretsManagerApi>, SecretsError> {
        if let Some(message) = self.config_error {
            return Err(SecretsError::config_load(message));
        }

        self.clients_built.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(ScriptedClient {
            behavior: self.behavior.clone(),
            requests: self.requests.clone(),
        }))
    }
}

/// Retriever wired to a static region, the given factory and a memory sink.
pub fn retriever(
    region: &str,
    factory: Arc<ScriptedFactory>,
) -> (SecretRetriever, Arc<MemoryLogSink>) {
    let sink = Arc::new(MemoryLogSink::new());
    let log_sink: Arc<dyn LogSink> = sink.clone();
    let retriever =
        SecretRetriever::new(Arc::new(StaticRegionProvider::new(region)), factory, log_sink);
    (retriever, sink)
}
