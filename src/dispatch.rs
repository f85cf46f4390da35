//! Provider and summary selection for a typed handle.
//!
//! Classification runs against the pointer-unwrapped value. When building a
//! provider for the unwrapped handle fails, one more attempt is made against
//! the original handle; if that fails too the error is logged and returned.

use tracing::{debug, warn};

use crate::classify::{classify_type, ArrayClassification};
use crate::config::InspectConfig;
use crate::core::TypedHandle;
use crate::error::{InspectError, Result};
use crate::introspect::{InspectContext, Introspector};
use crate::providers::{
    ArrayProvider, BooleanBufferProvider, DefaultProvider, OffsetBufferProvider,
    PrimitiveArrayProvider, StringArrayProvider, SyntheticProvider,
};
use crate::{log_error, span_trace};

/// Entry point used by a debugger binding.
#[derive(Clone, Copy)]
pub struct Dispatcher<'a> {
    ctx: InspectContext<'a>,
}

impl<'a> Dispatcher<'a> {
    pub fn new(introspector: &'a dyn Introspector, config: &'a InspectConfig) -> Self {
        Self {
            ctx: InspectContext::new(introspector, config),
        }
    }

    pub fn context(&self) -> InspectContext<'a> {
        self.ctx
    }

    /// Dereference `handle` while its static type is a pointer.
    pub fn unwrap_pointers(&self, handle: &TypedHandle) -> Result<TypedHandle> {
        let intro = self.ctx.introspector;
        let limit = self.ctx.config.max_pointer_depth;
        let mut current = handle.clone();
        for _ in 0..limit {
            if !intro.type_of(&current)?.is_pointer() {
                return Ok(current);
            }
            current = intro.dereference(&current)?;
        }
        if intro.type_of(&current)?.is_pointer() {
            return Err(InspectError::PointerDepthExceeded { limit });
        }
        Ok(current)
    }

    /// Classification of the value behind `handle`.
    pub fn classify_handle(&self, handle: &TypedHandle) -> Result<ArrayClassification> {
        let unwrapped = self.unwrap_pointers(handle)?;
        let ty = self.ctx.introspector.type_of(&unwrapped)?;
        Ok(classify_type(&ty))
    }

    fn build(&self, class: ArrayClassification, handle: &TypedHandle) -> Result<ArrayProvider<'a>> {
        let ctx = self.ctx;
        let provider = match class {
            ArrayClassification::PrimitiveArray => {
                ArrayProvider::Primitive(PrimitiveArrayProvider::new(ctx, handle)?)
            }
            ArrayClassification::StringArray => {
                ArrayProvider::String(StringArrayProvider::new(ctx, handle)?)
            }
            ArrayClassification::BooleanBuffer => {
                ArrayProvider::Boolean(BooleanBufferProvider::new(ctx, handle)?)
            }
            ArrayClassification::OffsetBuffer => {
                ArrayProvider::Offset(OffsetBufferProvider::new(ctx, handle)?)
            }
            ArrayClassification::Unknown => {
                ArrayProvider::Default(DefaultProvider::new(ctx.introspector, handle)?)
            }
        };
        Ok(provider)
    }

    /// Provider exposing the children of `handle`, already refreshed.
    pub fn select_provider(&self, handle: &TypedHandle) -> Result<ArrayProvider<'a>> {
        let span = span_trace!(
            "select_provider",
            type_name = %handle.type_name,
            address = handle.address
        );
        let _enter = span.enter();

        let unwrapped = self.unwrap_pointers(handle).map_err(|e| log_error!(e))?;
        let ty = self
            .ctx
            .introspector
            .type_of(&unwrapped)
            .map_err(|e| log_error!(e))?;
        let class = classify_type(&ty);
        debug!(classification = %class, unwrapped = %unwrapped.type_name, "Classified value");

        // Values that are not Arrow arrays pass through as the original handle.
        if !class.is_known() {
            return self.build(class, handle).map_err(|e| log_error!(e));
        }

        match self.build(class, &unwrapped) {
            Ok(provider) => Ok(provider),
            Err(first) if self.ctx.config.retry_original_handle && unwrapped != *handle => {
                warn!(
                    error = %first,
                    original = %handle.type_name,
                    "Provider construction failed on unwrapped value, retrying original handle"
                );
                self.build(class, handle).map_err(|e| log_error!(e))
            }
            Err(e) => Err(log_error!(e)),
        }
    }

    /// One-line summary: `length=N` for Arrow values, empty otherwise.
    pub fn select_summary(&self, handle: &TypedHandle) -> Result<String> {
        let class = self.classify_handle(handle).map_err(|e| log_error!(e))?;
        if !class.is_known() {
            return Ok(String::new());
        }
        let provider = self.select_provider(handle)?;
        Ok(format!("length={}", provider.num_children()))
    }

    /// Preview of up to `limit` children, e.g. `[1, None, 3, ...]`.
    pub fn render_children(&self, handle: &TypedHandle, limit: usize) -> Result<String> {
        let provider = self.select_provider(handle)?;
        let total = provider.num_children();
        let mut parts = Vec::with_capacity(total.min(limit) + 1);
        for index in 0..total.min(limit) {
            let child = provider.child_at_index(index)?;
            parts.push(child.render(self.ctx.introspector)?);
        }
        if total > limit {
            parts.push("...".to_string());
        }
        Ok(format!("[{}]", parts.join(", ")))
    }
}
