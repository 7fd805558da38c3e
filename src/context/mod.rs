pub mod audio_probe;
pub mod config;
pub mod container_runtime;
pub mod file_system;

use std::sync::Arc;

use crate::notifications::NotificationClient;
use audio_probe::AudioProbe;
use config::ScribConfig;
use container_runtime::ContainerRuntime;
use file_system::FileSystemOperations;

#[derive(Clone)]
pub struct AppContext {
    config: ScribConfig,
    container_runtime: Arc<dyn ContainerRuntime>,
    audio_probe: Arc<dyn AudioProbe>,
    file_system: Arc<dyn FileSystemOperations>,
    notification_client: Arc<dyn NotificationClient>,
}

impl AppContext {
    pub fn builder() -> AppContextBuilder {
        AppContextBuilder::new()
    }

    pub fn config(&self) -> &ScribConfig {
        &self.config
    }

    pub fn container_runtime(&self) -> Arc<dyn ContainerRuntime> {
        Arc::clone(&self.container_runtime)
    }

    pub fn audio_probe(&self) -> Arc<dyn AudioProbe> {
        Arc::clone(&self.audio_probe)
    }

    pub fn file_system(&self) -> Arc<dyn FileSystemOperations> {
        Arc::clone(&self.file_system)
    }

    pub fn notification_client(&self) -> Arc<dyn NotificationClient> {
        Arc::clone(&self.notification_client)
    }
}

pub struct AppContextBuilder {
    config: Option<ScribConfig>,
    container_runtime: Option<Arc<dyn ContainerRuntime>>,
    audio_probe: Option<Arc<dyn AudioProbe>>,
    file_system: Option<Arc<dyn FileSystemOperations>>,
    notification_client: Option<Arc<dyn NotificationClient>>,
}

impl AppContextBuilder {
    pub fn new() -> Self {
        Self {
            config: None,
            container_runtime: None,
            audio_probe: None,
            file_system: None,
            notification_client: None,
        }
    }

    pub fn with_config(mut self, config: ScribConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_container_runtime(
        mut self,
        container_runtime: Arc<dyn ContainerRuntime>,
    ) -> Self {
        self.container_runtime = Some(container_runtime);
        self
    }

    pub fn with_audio_probe(mut self, audio_probe: Arc<dyn AudioProbe>) -> Self {
        self.audio_probe = Some(audio_probe);
        self
    }

    pub fn with_file_system(mut self, file_system: Arc<dyn FileSystemOperations>) -> Self {
        self.file_system = Some(file_system);
        self
    }

    pub fn with_notification_client(
        mut self,
        notification_client: Arc<dyn NotificationClient>,
    ) -> Self {
        self.notification_client = Some(notification_client);
        self
    }

    pub fn build(self) -> AppContext {
        let config = self.config.unwrap_or_default();

        AppContext {
            container_runtime: self.container_runtime.unwrap_or_else(|| {
                Arc::new(container_runtime::CliContainerRuntime::new(
                    &config.container_tool,
                ))
            }),
            audio_probe: self
                .audio_probe
                .unwrap_or_else(|| Arc::new(audio_probe::FfprobeAudioProbe)),
            file_system: self
                .file_system
                .unwrap_or_else(|| Arc::new(file_system::DefaultFileSystem)),
            notification_client: self
                .notification_client
                .unwrap_or_else(crate::notifications::create_notification_client),
            config,
        }
    }
}

impl Default for AppContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
