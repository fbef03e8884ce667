//! Application lifetime root.
//!
//! The application owns the identity bridge, namespace registry, and style cache,
//! and registers the callback surface the native engine drives. Component code
//! receives the application (or its deployment) explicitly; the only process-wide
//! state is the current-application slot, set by the first construction and
//! cleared on termination.

use std::io::Read;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, ThreadId};

use serde_json::Value;

use crate::app::deployment::Deployment;
use crate::app::module::Module;
use crate::app::AppError;
use crate::bridge::{HandleCell, IdentityBridge, NativeWrapper};
use crate::engine::callbacks::EngineCallbacks;
use crate::engine::native::{EngineError, NativeEngine, PropertyDescriptor};
use crate::error::Error;
use crate::markup::MarkupLoader;
use crate::registry::NamespaceRegistry;
use crate::resource::{self, ResourceError, ResourceLocator, ResourceStream};
use crate::style::{Style, StyleCache};

static CURRENT: Mutex<Option<Arc<Application>>> = Mutex::new(None);

type Hook = Box<dyn Fn() + Send + Sync>;
type ErrorHook = Box<dyn Fn(&Error) + Send + Sync>;

/// The application singleton: lifetime root and service container.
pub struct Application {
    engine: Arc<dyn NativeEngine>,
    loader: Arc<dyn MarkupLoader>,
    deployment: Deployment,
    bridge: IdentityBridge,
    registry: NamespaceRegistry,
    styles: StyleCache,
    handle_cell: HandleCell,
    root_visual: Mutex<Option<Arc<dyn NativeWrapper>>>,
    startup_hooks: Mutex<Vec<Hook>>,
    exit_hooks: Mutex<Vec<Hook>>,
    unhandled_error_hook: Mutex<Option<ErrorHook>>,
    ui_thread: ThreadId,
    terminated: AtomicBool,
}

impl Application {
    /// Construct the application and wire it to the native engine.
    ///
    /// Allocates the native application object, binds it through the identity
    /// bridge, registers every deployment module's namespace mappings, and hands
    /// the callback surface to the engine. The constructing thread becomes the
    /// UI-owning context.
    ///
    /// The first construction claims the current-application slot; a later
    /// construction while one is live does not replace it, but inherits its root
    /// visual.
    pub fn new(
        engine: Arc<dyn NativeEngine>,
        loader: Arc<dyn MarkupLoader>,
        deployment: Deployment,
    ) -> crate::Result<Arc<Self>> {
        let handle = engine.create_application();

        let app = Arc::new(Self {
            engine,
            loader,
            deployment,
            bridge: IdentityBridge::new(),
            registry: NamespaceRegistry::new(),
            styles: StyleCache::new(),
            handle_cell: HandleCell::new(),
            root_visual: Mutex::new(None),
            startup_hooks: Mutex::new(Vec::new()),
            exit_hooks: Mutex::new(Vec::new()),
            unhandled_error_hook: Mutex::new(None),
            ui_thread: thread::current().id(),
            terminated: AtomicBool::new(false),
        });

        let wrapper: Arc<dyn NativeWrapper> = app.clone();
        app.bridge.bind(handle, wrapper)?;

        for module in app.deployment.modules() {
            app.registry.register_module(module);
        }

        app.engine
            .register_callbacks(handle, EngineCallbacks::for_application(&app));

        let mut current = CURRENT.lock().unwrap_or_else(|e| e.into_inner());
        match current.as_ref() {
            None => *current = Some(app.clone()),
            Some(existing) => {
                let inherited = existing
                    .root_visual
                    .lock()
                    .unwrap_or_else(|e| e.into_inner())
                    .clone();
                *app.root_visual.lock().unwrap_or_else(|e| e.into_inner()) = inherited;
            }
        }

        Ok(app)
    }

    /// The current application, if one is live.
    pub fn current() -> Option<Arc<Application>> {
        CURRENT.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Tear the application down.
    ///
    /// Idempotent. Fires exit hooks, best-effort deletes the package directory,
    /// clears the root visual, and releases the current-application slot if this
    /// instance holds it.
    pub fn terminate(self: &Arc<Self>) {
        if self.terminated.swap(true, Ordering::SeqCst) {
            return;
        }

        for hook in self
            .exit_hooks
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
        {
            hook();
        }

        if let Err(err) = std::fs::remove_dir_all(self.deployment.package_dir()) {
            log::debug!(
                "failed to remove package directory {:?}: {}",
                self.deployment.package_dir(),
                err
            );
        }

        *self.root_visual.lock().unwrap_or_else(|e| e.into_inner()) = None;

        let mut current = CURRENT.lock().unwrap_or_else(|e| e.into_inner());
        if current
            .as_ref()
            .is_some_and(|live| Arc::ptr_eq(live, self))
        {
            *current = None;
        }
    }

    /// Resolve a resource locator against this application's package.
    pub fn resolve_resource(&self, locator: &str) -> Result<Option<ResourceStream>, ResourceError> {
        resource::resolve(&self.deployment, locator)
    }

    /// Extract a resource nested inside another resource's stream.
    pub fn resolve_nested_resource<R: Read>(
        container: R,
        inner_path: &str,
    ) -> Result<Option<ResourceStream>, ResourceError> {
        resource::resolve_nested(container, inner_path)
    }

    /// The default style for a type, loaded lazily from the owning module's
    /// generic style document.
    pub fn generic_style_for(&self, module: &Arc<Module>, full_type_name: &str) -> Option<Style> {
        self.styles
            .style_for(&self.deployment, self.loader.as_ref(), module, full_type_name)
    }

    /// Hydrate an existing native-backed object from a markup document.
    ///
    /// The target already exists; only its property graph is populated. An
    /// unresolvable locator is a silent success, matching resource-miss
    /// semantics.
    pub fn load_component(&self, target: &dyn NativeWrapper, locator: &str) -> crate::Result<()> {
        let handle = target.native_handle().ok_or(AppError::TargetNotBound)?;

        let Some(mut stream) = self.resolve_resource(locator)? else {
            return Ok(());
        };
        let mut markup = String::new();
        stream.read_to_string(&mut markup).map_err(ResourceError::from)?;

        let parsed = ResourceLocator::parse(locator)?;
        let module = parsed
            .module
            .as_deref()
            .and_then(|name| self.deployment.module(name))
            .unwrap_or_else(|| self.deployment.entry_module())
            .clone();

        self.loader.hydrate(handle, &module, &markup)?;
        Ok(())
    }

    /// Whether the calling thread is the UI-owning context.
    pub fn check_access(&self) -> bool {
        thread::current().id() == self.ui_thread
    }

    /// The application's Resources property, read through the engine.
    pub fn resources(&self) -> Result<Value, EngineError> {
        let handle = self.native_handle().ok_or(EngineError::Unbound)?;
        self.engine
            .get_value(handle, &PropertyDescriptor::new("Application", "Resources"))
    }

    pub fn root_visual(&self) -> Option<Arc<dyn NativeWrapper>> {
        self.root_visual
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Set the root visual. Can only be set once; later sets are ignored.
    pub fn set_root_visual(&self, visual: Arc<dyn NativeWrapper>) {
        let mut root = self.root_visual.lock().unwrap_or_else(|e| e.into_inner());
        if root.is_none() {
            *root = Some(visual);
        }
    }

    /// Register a startup hook, fired by [`Application::notify_startup`].
    pub fn on_startup(&self, hook: impl Fn() + Send + Sync + 'static) {
        self.startup_hooks
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(Box::new(hook));
    }

    /// Register an exit hook, fired during [`Application::terminate`].
    pub fn on_exit(&self, hook: impl Fn() + Send + Sync + 'static) {
        self.exit_hooks
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(Box::new(hook));
    }

    /// Fire startup hooks. Called by the hosting shell once the package is ready.
    pub fn notify_startup(&self) {
        for hook in self
            .startup_hooks
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
        {
            hook();
        }
    }

    /// Install the unhandled-error hook.
    pub fn set_unhandled_error_hook(&self, hook: impl Fn(&Error) + Send + Sync + 'static) {
        *self
            .unhandled_error_hook
            .lock()
            .unwrap_or_else(|e| e.into_inner()) = Some(Box::new(hook));
    }

    /// Route an error nothing else handled to the hook, or log it.
    pub fn report_unhandled_error(&self, error: &Error) {
        let hook = self
            .unhandled_error_hook
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        match hook.as_ref() {
            Some(hook) => hook(error),
            None => log::error!("unhandled application error: {}", error),
        }
    }

    pub fn deployment(&self) -> &Deployment {
        &self.deployment
    }

    pub fn bridge(&self) -> &IdentityBridge {
        &self.bridge
    }

    pub fn registry(&self) -> &NamespaceRegistry {
        &self.registry
    }

    pub fn engine(&self) -> &Arc<dyn NativeEngine> {
        &self.engine
    }
}

impl NativeWrapper for Application {
    fn handle_cell(&self) -> &HandleCell {
        &self.handle_cell
    }
}
