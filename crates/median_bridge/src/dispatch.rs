//! Command dispatch: fire-and-forget and dispatch-with-reply.

use std::{
    future::Future,
    marker::PhantomData,
    pin::Pin,
    rc::Rc,
    task::{Context, Poll},
};

use futures::channel::oneshot;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

use crate::{
    config::BridgeConfig,
    envelope::{to_plain_value, Channel, CommandEnvelope},
    error::{json_kind, BridgeError, BridgeResult},
    host::HostBridge,
    naming::RegistryId,
    registry::CallbackRegistry,
};

/// Builds envelopes and hands them to the host bridge.
#[derive(Clone)]
pub struct CommandDispatcher {
    host: Rc<dyn HostBridge>,
    registry: CallbackRegistry,
    config: Rc<BridgeConfig>,
}

impl std::fmt::Debug for CommandDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandDispatcher")
            .field("registry", &self.registry)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl CommandDispatcher {
    /// Creates a dispatcher posting to `host` and registering replies in `registry`.
    pub fn new(host: Rc<dyn HostBridge>, registry: CallbackRegistry, config: Rc<BridgeConfig>) -> Self {
        Self {
            host,
            registry,
            config,
        }
    }

    /// Returns the registry replies are routed through.
    pub fn registry(&self) -> &CallbackRegistry {
        &self.registry
    }

    /// Returns the active bridge configuration.
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Returns whether the host bridge is currently reachable.
    pub fn host_available(&self) -> bool {
        self.host.is_host_available()
    }

    /// Sends a command without waiting for a reply.
    ///
    /// The envelope is validated even when no host is present; with no host the call is then a
    /// silent no-op.
    ///
    /// # Errors
    ///
    /// Returns channel/parameter validation errors, or [`BridgeError::Transport`] when a present
    /// host rejects the message.
    pub fn send<P: Serialize + ?Sized>(
        &self,
        channel: &str,
        params: Option<&P>,
        raw_params_mode: bool,
    ) -> BridgeResult<()> {
        let params = params.map(to_plain_value).transpose()?;
        self.send_value(channel, params, raw_params_mode)
    }

    /// Sends a command whose parameters are already JSON.
    ///
    /// # Errors
    ///
    /// Same as [`CommandDispatcher::send`].
    pub fn send_value(
        &self,
        channel: &str,
        params: Option<Value>,
        raw_params_mode: bool,
    ) -> BridgeResult<()> {
        let envelope = CommandEnvelope::from_value(Channel::new(channel)?, params, raw_params_mode)?;
        self.post(&envelope)
    }

    /// Sends a command and returns a handle completing with the host's reply.
    ///
    /// Without a host the returned reply is already settled with
    /// [`BridgeError::HostUnavailable`]. A reply the host never sends stays pending; callers
    /// wanting a deadline race it against their own timer and then unregister [`PendingReply::id`].
    ///
    /// # Errors
    ///
    /// Returns validation errors before anything crosses the boundary, and
    /// [`BridgeError::Transport`] when the host rejects the message (the reply entry is removed).
    pub fn send_with_reply<P: Serialize + ?Sized>(
        &self,
        channel: &str,
        params: Option<&P>,
    ) -> BridgeResult<PendingReply> {
        let channel = Channel::new(channel)?;
        let params = self.reply_params(params)?;
        if !self.host.is_host_available() {
            log::debug!("no host bridge; `{channel}` settles as unavailable");
            return Ok(PendingReply::failed(BridgeError::HostUnavailable));
        }

        let (sender, receiver) = oneshot::channel();
        let id = self
            .registry
            .register_one_shot(&self.config.reply_prefix, move |payload| {
                let _ = sender.send(payload);
            });
        self.post_with_callback(channel, params, &id)?;
        Ok(PendingReply {
            id: Some(id),
            state: ReplyState::Waiting(receiver),
        })
    }

    /// Sends a command whose reply callback stays registered for repeated host calls.
    ///
    /// Returns the callback id; unregister it to stop deliveries. Without a host nothing is
    /// registered and an id is still returned.
    ///
    /// # Errors
    ///
    /// Same as [`CommandDispatcher::send_with_reply`].
    pub fn send_with_callback<P: Serialize + ?Sized>(
        &self,
        channel: &str,
        params: Option<&P>,
        handler: impl Fn(&Value) + 'static,
    ) -> BridgeResult<RegistryId> {
        let channel = Channel::new(channel)?;
        let params = self.reply_params(params)?;
        if !self.host.is_host_available() {
            log::debug!("no host bridge; dropping `{channel}`");
            return Ok(self.registry.names().next_name(&self.config.reply_prefix));
        }

        let id = self
            .registry
            .register_standalone(&self.config.reply_prefix, handler);
        self.post_with_callback(channel, params, &id)?;
        Ok(id)
    }

    /// Registers a persistent callback whose name the caller embeds in its own parameters.
    ///
    /// The callback is reachable only through the returned id. Without a host nothing is
    /// registered and a fresh id is still returned.
    pub fn register_callback(&self, handler: impl Fn(&Value) + 'static) -> RegistryId {
        if !self.host.is_host_available() {
            log::debug!("no host bridge; callback not registered");
            return self.registry.names().next_name(&self.config.reply_prefix);
        }
        self.registry
            .register_standalone(&self.config.reply_prefix, handler)
    }

    /// Sends a command and decodes the reply as `T`.
    ///
    /// # Errors
    ///
    /// Returns dispatch errors, [`BridgeError::HostUnavailable`] without a host,
    /// [`BridgeError::Abandoned`] when the reply entry is removed first, or
    /// [`BridgeError::Decode`] for an unexpected payload.
    pub async fn request<P, T>(&self, channel: &str, params: Option<&P>) -> BridgeResult<T>
    where
        P: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_with_reply(channel, params)?.typed::<T>().await
    }

    fn reply_params<P: Serialize + ?Sized>(
        &self,
        params: Option<&P>,
    ) -> BridgeResult<Map<String, Value>> {
        match params.map(to_plain_value).transpose()? {
            None | Some(Value::Null) => Ok(Map::new()),
            Some(Value::Object(map)) => Ok(map),
            Some(other) => Err(BridgeError::ParamsNotObject(json_kind(&other))),
        }
    }

    fn post_with_callback(
        &self,
        channel: Channel,
        mut params: Map<String, Value>,
        id: &RegistryId,
    ) -> BridgeResult<()> {
        params.insert(
            self.config.reply_field.clone(),
            Value::String(id.as_str().to_string()),
        );
        let envelope = CommandEnvelope::from_value(channel, Some(Value::Object(params)), false)?;
        self.host.post_envelope(&envelope).inspect_err(|err| {
            log::warn!("host rejected `{}`: {err}", envelope.channel);
            self.registry.unregister(id.as_str());
        })
    }

    fn post(&self, envelope: &CommandEnvelope) -> BridgeResult<()> {
        if !self.host.is_host_available() {
            log::debug!("no host bridge; dropping `{}`", envelope.channel);
            return Ok(());
        }
        self.host.post_envelope(envelope).inspect_err(|err| {
            log::warn!("host rejected `{}`: {err}", envelope.channel);
        })
    }
}

enum ReplyState {
    Waiting(oneshot::Receiver<Value>),
    Settled(Option<BridgeResult<Value>>),
}

/// Completion handle for [`CommandDispatcher::send_with_reply`].
pub struct PendingReply {
    id: Option<RegistryId>,
    state: ReplyState,
}

impl std::fmt::Debug for PendingReply {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match &self.state {
            ReplyState::Waiting(_) => "waiting",
            ReplyState::Settled(Some(_)) => "settled",
            ReplyState::Settled(None) => "consumed",
        };
        f.debug_struct("PendingReply")
            .field("id", &self.id)
            .field("state", &state)
            .finish()
    }
}

impl PendingReply {
    /// Creates a reply that is already settled with `error`.
    pub fn failed(error: BridgeError) -> Self {
        Self {
            id: None,
            state: ReplyState::Settled(Some(Err(error))),
        }
    }

    /// Returns the registry id the host answers through, if the command was dispatched.
    pub fn id(&self) -> Option<&RegistryId> {
        self.id.as_ref()
    }

    /// Returns whether the reply settled without waiting on the host.
    pub fn is_settled(&self) -> bool {
        matches!(self.state, ReplyState::Settled(_))
    }

    /// Decodes the eventual payload as `T`.
    pub fn typed<T: DeserializeOwned>(self) -> TypedReply<T> {
        TypedReply {
            inner: self,
            _marker: PhantomData,
        }
    }
}

impl Future for PendingReply {
    type Output = BridgeResult<Value>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        match &mut this.state {
            ReplyState::Settled(result) => Poll::Ready(
                result
                    .take()
                    .unwrap_or_else(|| Err(BridgeError::Abandoned(reply_label(&this.id)))),
            ),
            ReplyState::Waiting(receiver) => match Pin::new(receiver).poll(cx) {
                Poll::Pending => Poll::Pending,
                Poll::Ready(Ok(payload)) => {
                    this.state = ReplyState::Settled(None);
                    Poll::Ready(Ok(payload))
                }
                Poll::Ready(Err(oneshot::Canceled)) => {
                    this.state = ReplyState::Settled(None);
                    Poll::Ready(Err(BridgeError::Abandoned(reply_label(&this.id))))
                }
            },
        }
    }
}

fn reply_label(id: &Option<RegistryId>) -> String {
    id.as_ref()
        .map_or_else(|| "<unsent>".to_string(), |id| id.as_str().to_string())
}

/// [`PendingReply`] decoding its payload into `T`.
pub struct TypedReply<T> {
    inner: PendingReply,
    _marker: PhantomData<fn() -> T>,
}

impl<T> std::fmt::Debug for TypedReply<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("TypedReply").field(&self.inner).finish()
    }
}

impl<T> TypedReply<T> {
    /// Returns the registry id the host answers through, if the command was dispatched.
    pub fn id(&self) -> Option<&RegistryId> {
        self.inner.id()
    }
}

impl<T: DeserializeOwned> Future for TypedReply<T> {
    type Output = BridgeResult<T>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        match Pin::new(&mut this.inner).poll(cx) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(result) => Poll::Ready(result.and_then(|payload| {
                serde_json::from_value(payload).map_err(|err| BridgeError::Decode(err.to_string()))
            })),
        }
    }
}
