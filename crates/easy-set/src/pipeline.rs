//! Multi-step mutation pipeline.
//!
//! Steps run in order against one session. Each step returns a [`Handoff`]
//! that picks where the next step starts: a container produced by a view, or
//! the root again.

use serde_json::Value;

use crate::document::ContainerId;
use crate::error::EasySetError;
use crate::options::Options;
use crate::session::Session;
use crate::view::{Access, View};

/// Where the next pipeline step starts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Handoff {
    /// Start again at the session root.
    #[default]
    Root,
    /// Start at a container of the session that produced this hand-off.
    Container { origin: u64, id: ContainerId },
}

impl From<View<'_>> for Handoff {
    fn from(view: View<'_>) -> Self {
        view.handoff()
    }
}

impl From<&View<'_>> for Handoff {
    fn from(view: &View<'_>) -> Self {
        view.handoff()
    }
}

impl From<Access<'_>> for Handoff {
    fn from(access: Access<'_>) -> Self {
        match access {
            Access::View(view) => view.handoff(),
            Access::Value(_) => Handoff::Root,
        }
    }
}

impl From<()> for Handoff {
    fn from(_: ()) -> Self {
        Handoff::Root
    }
}

/// One transformation of a pipeline.
pub trait Step {
    fn run(self: Box<Self>, view: View<'_>) -> Result<Handoff, EasySetError>;
}

impl<F> Step for F
where
    F: FnOnce(View<'_>) -> Result<Handoff, EasySetError>,
{
    fn run(self: Box<Self>, view: View<'_>) -> Result<Handoff, EasySetError> {
        (*self)(view)
    }
}

/// Box a closure as a pipeline step.
pub fn step<'a, F>(f: F) -> Box<dyn Step + 'a>
where
    F: FnOnce(View<'_>) -> Result<Handoff, EasySetError> + 'a,
{
    Box::new(f)
}

impl Session {
    /// View for the start of a pipeline step.
    ///
    /// Hand-offs minted by another session fall back to the root.
    pub fn view(&mut self, handoff: Handoff) -> View<'_> {
        match handoff {
            Handoff::Root => self.root(),
            Handoff::Container { origin, id }
                if origin == self.document.origin() && self.document.contains(id) =>
            {
                View::new(self, id)
            }
            Handoff::Container { origin, id } => {
                tracing::warn!(
                    origin,
                    container = id.index(),
                    "ignoring hand-off from another session"
                );
                self.root()
            }
        }
    }

    /// Run `steps` left to right.
    ///
    /// Stops at the first failing step. Writes made before the failure stay.
    pub fn run<'a, I>(&mut self, steps: I) -> Result<(), EasySetError>
    where
        I: IntoIterator<Item = Box<dyn Step + 'a>>,
    {
        let mut handoff = Handoff::Root;
        for (position, step) in steps.into_iter().enumerate() {
            let view = self.view(handoff);
            handoff = step.run(view)?;
            tracing::trace!(position, ?handoff, "step finished");
        }
        Ok(())
    }
}

/// Run `steps` against `root` and return `root`, mutated in place.
///
/// When a step fails, `root` still receives every write made before the
/// failure and the error is returned.
///
/// # Example
///
/// ```
/// use easy_set::{apply_mutations, step, View};
/// use serde_json::json;
///
/// let mut doc = json!({});
/// apply_mutations(
///     &mut doc,
///     vec![
///         step(|root: View<'_>| Ok(root.at("a")?.at("b")?.handoff())),
///         step(|mut b: View<'_>| {
///             b.set("c", 1)?;
///             Ok(().into())
///         }),
///     ],
/// )
/// .unwrap();
/// assert_eq!(doc, json!({"a": {"b": {"c": 1}}}));
/// ```
pub fn apply_mutations<'v, 'a, I>(root: &'v mut Value, steps: I) -> Result<&'v mut Value, EasySetError>
where
    I: IntoIterator<Item = Box<dyn Step + 'a>>,
{
    apply_mutations_with(root, steps, Options::default())
}

/// [`apply_mutations`] with explicit session options.
pub fn apply_mutations_with<'v, 'a, I>(
    root: &'v mut Value,
    steps: I,
    options: Options,
) -> Result<&'v mut Value, EasySetError>
where
    I: IntoIterator<Item = Box<dyn Step + 'a>>,
{
    if !matches!(root, Value::Object(_) | Value::Array(_)) {
        return Err(EasySetError::not_a_container(""));
    }
    let mut session = Session::with_options(std::mem::take(root), options)?;
    let outcome = session.run(steps);
    *root = session.into_value();
    outcome.map(|()| root)
}

/// Single-step form of [`apply_mutations`].
///
/// # Example
///
/// ```
/// use easy_set::easy_set;
/// use serde_json::json;
///
/// let mut doc = json!({});
/// easy_set(&mut doc, |a| a.at("b")?.at("c")?.index(2)?.set("b", json!({}))).unwrap();
/// assert_eq!(doc, json!({"b": {"c": [null, null, {"b": {}}]}}));
/// ```
pub fn easy_set<F>(root: &mut Value, setter: F) -> Result<&mut Value, EasySetError>
where
    F: FnOnce(View<'_>) -> Result<(), EasySetError>,
{
    apply_mutations(root, [step(move |view: View<'_>| setter(view).map(|()| Handoff::Root))])
}
