//! Shader module loading and caching.

use log::{debug, info, warn};
use std::{collections::HashMap, sync::Arc};
use thiserror::Error;
use wgpu::{ShaderModuleDescriptor, ShaderSource};

#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("shader '{name}' failed to compile: {message}")]
    CompilationFailed { name: String, message: String },
}

/// Compiled shader modules by name.
#[derive(Default)]
pub struct ShaderLibrary {
    modules: HashMap<String, Arc<wgpu::ShaderModule>>,
}

impl ShaderLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile WGSL `source` under `name`, replacing any module already loaded with that name.
    pub fn load_from_source(
        &mut self,
        device: &wgpu::Device,
        name: &str,
        source: &str,
    ) -> Result<Arc<wgpu::ShaderModule>, ShaderError> {
        debug!("Loading shader '{}' from source", name);

        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let module = device.create_shader_module(ShaderModuleDescriptor {
            label: Some(name),
            source: ShaderSource::Wgsl(source.into()),
        });
        if let Some(e) = pollster::block_on(device.pop_error_scope()) {
            return Err(ShaderError::CompilationFailed {
                name: name.to_string(),
                message: e.to_string(),
            });
        }

        let info = pollster::block_on(module.get_compilation_info());
        let mut errors = Vec::new();
        for message in &info.messages {
            match message.message_type {
                wgpu::CompilationMessageType::Error => errors.push(message.message.clone()),
                _ => warn!("Shader '{}': {}", name, message.message),
            }
        }
        if !errors.is_empty() {
            return Err(ShaderError::CompilationFailed {
                name: name.to_string(),
                message: errors.join("; "),
            });
        }

        let module = Arc::new(module);
        if self
            .modules
            .insert(name.to_string(), Arc::clone(&module))
            .is_some()
        {
            info!("Replaced shader '{}'", name);
        } else {
            info!("Loaded shader '{}'", name);
        }
        Ok(module)
    }

    pub fn get(&self, name: &str) -> Option<Arc<wgpu::ShaderModule>> {
        self.modules.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}
