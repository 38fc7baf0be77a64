//! Explicit collection stack that authoring code registers records into.
//!
//! Instead of ambient global state, authoring functions take a
//! `&mut RecordContext`. Named records registered through it land in the
//! collection on top of the stack.

use std::ops::{Deref, DerefMut};

use tracing::{trace, warn};

use crate::model::{Collection, Comment, Record, RecordRef};

/// Outcome of [`RecordContext::register`].
#[derive(Debug, Clone, PartialEq)]
pub enum Registration {
    /// The record was appended to the active collection.
    Registered(RecordRef),
    /// The record was not eligible (no identity, or no active collection)
    /// and is handed back to the caller.
    Detached(Record),
}

impl Registration {
    /// Returns the reference if the record was registered.
    pub fn reference(&self) -> Option<&RecordRef> {
        match self {
            Registration::Registered(r) => Some(r),
            Registration::Detached(_) => None,
        }
    }

    pub fn is_registered(&self) -> bool {
        matches!(self, Registration::Registered(_))
    }

    /// Returns the record if it was handed back.
    pub fn into_detached(self) -> Option<Record> {
        match self {
            Registration::Registered(_) => None,
            Registration::Detached(r) => Some(r),
        }
    }
}

/// Stack of active collections.
#[derive(Debug, Default)]
pub struct RecordContext {
    stack: Vec<Collection>,
}

impl RecordContext {
    /// Creates a context with no active collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes a collection; it becomes the registration target.
    pub fn push(&mut self, collection: Collection) {
        self.stack.push(collection);
    }

    /// Pops the active collection.
    pub fn pop(&mut self) -> Option<Collection> {
        self.stack.pop()
    }

    /// Number of active collections.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Returns the collection on top of the stack.
    pub fn current(&self) -> Option<&Collection> {
        self.stack.last()
    }

    pub fn current_mut(&mut self) -> Option<&mut Collection> {
        self.stack.last_mut()
    }

    /// Registers a record into the active collection.
    ///
    /// Only named records register; everything else comes back as
    /// [`Registration::Detached`].
    pub fn register(&mut self, record: Record) -> Registration {
        let Some(reference) = record.id().map(RecordRef::new) else {
            return Registration::Detached(record);
        };
        match self.stack.last_mut() {
            Some(top) => {
                trace!(id = reference.id(), type_name = record.type_name(), "registered record");
                top.push(record);
                Registration::Registered(reference)
            }
            None => {
                warn!(id = reference.id(), "no active collection, record not registered");
                Registration::Detached(record)
            }
        }
    }

    /// Appends a comment to the active collection. Returns false if there is
    /// no active collection.
    pub fn comment(&mut self, text: impl Into<String>) -> bool {
        match self.stack.last_mut() {
            Some(top) => {
                top.push(Comment::new(text));
                true
            }
            None => false,
        }
    }

    /// Appends a whole collection as a member of the active collection.
    /// Hands the collection back if there is no active collection.
    pub fn nest(&mut self, collection: Collection) -> Result<(), Collection> {
        match self.stack.last_mut() {
            Some(top) => {
                top.push(collection);
                Ok(())
            }
            None => Err(collection),
        }
    }

    /// Finds a named record in any active collection, innermost first.
    pub fn find_mut(&mut self, id: &str) -> Option<&mut Record> {
        self.stack.iter_mut().rev().find_map(|c| c.find_mut(id))
    }

    /// Runs `f` with a fresh collection on top of the stack and returns that
    /// collection with the block's result.
    ///
    /// The collection is popped on every exit path, including error returns
    /// and unwinding; anything the block left pushed is discarded, so the
    /// stack depth after the call equals the depth before it.
    pub fn collect<T, E, F>(&mut self, f: F) -> Result<(Collection, T), E>
    where
        F: FnOnce(&mut RecordContext) -> Result<T, E>,
    {
        let mut scope = Scope::enter(self);
        let out = f(&mut *scope)?;
        let collection = scope.leave();
        Ok((collection, out))
    }
}

/// Restores the stack depth when dropped.
struct Scope<'a> {
    ctx: &'a mut RecordContext,
    depth: usize,
}

impl<'a> Scope<'a> {
    fn enter(ctx: &'a mut RecordContext) -> Self {
        let depth = ctx.depth();
        ctx.push(Collection::new());
        Self { ctx, depth }
    }

    /// Takes the scope's collection off the stack. Returns an empty
    /// collection if the block already popped it.
    fn leave(&mut self) -> Collection {
        let start = self.depth.min(self.ctx.stack.len());
        let mut pushed = self.ctx.stack.drain(start..);
        pushed.next().unwrap_or_default()
    }
}

impl Deref for Scope<'_> {
    type Target = RecordContext;

    fn deref(&self) -> &RecordContext {
        self.ctx
    }
}

impl DerefMut for Scope<'_> {
    fn deref_mut(&mut self) -> &mut RecordContext {
        self.ctx
    }
}

impl Drop for Scope<'_> {
    fn drop(&mut self) {
        self.ctx.stack.truncate(self.depth);
    }
}

#[cfg(test)]
mod tests {
    use std::panic::{catch_unwind, AssertUnwindSafe};

    use super::*;
    use crate::model::{Identity, Properties};

    fn named(id: &str) -> Record {
        Record::new("ItemType", id, Properties::new())
    }

    #[test]
    fn test_register_named_in_order() {
        let mut ctx = RecordContext::new();
        let (collection, _) = ctx
            .collect(|ctx| {
                assert!(ctx.register(named("a")).is_registered());
                assert!(ctx.register(named("b")).is_registered());
                Ok::<_, ()>(())
            })
            .unwrap();
        let ids: Vec<_> = collection.records().filter_map(Record::id).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_unnamed_records_detach() {
        let mut ctx = RecordContext::new();
        let (collection, _) = ctx
            .collect(|ctx| {
                let inherited = Record::new("ItemReaction", Identity::Inherited, Properties::new());
                let absent = Record::new("DialogOption", Identity::Absent, Properties::new());
                assert!(ctx.register(inherited).into_detached().is_some());
                assert!(ctx.register(absent).into_detached().is_some());
                Ok::<_, ()>(())
            })
            .unwrap();
        assert!(collection.is_empty());
    }

    #[test]
    fn test_register_without_collection_detaches() {
        let mut ctx = RecordContext::new();
        let reg = ctx.register(named("a"));
        assert!(reg.reference().is_none());
        assert_eq!(reg.into_detached().unwrap().id(), Some("a"));
    }

    #[test]
    fn test_collect_balances_on_error() {
        let mut ctx = RecordContext::new();
        ctx.push(Collection::new());
        let result: Result<(Collection, ()), &str> = ctx.collect(|ctx| {
            ctx.register(named("lost"));
            ctx.push(Collection::new());
            Err("boom")
        });
        assert_eq!(result.unwrap_err(), "boom");
        assert_eq!(ctx.depth(), 1);
        assert!(ctx.current().unwrap().is_empty());
    }

    #[test]
    fn test_collect_balances_on_panic() {
        let mut ctx = RecordContext::new();
        let outcome = catch_unwind(AssertUnwindSafe(|| {
            let _ = ctx.collect(|_| -> Result<(), ()> { panic!("authoring bug") });
        }));
        assert!(outcome.is_err());
        assert_eq!(ctx.depth(), 0);
    }

    #[test]
    fn test_collect_discards_unbalanced_pushes() {
        let mut ctx = RecordContext::new();
        let (collection, _) = ctx
            .collect(|ctx| {
                ctx.register(named("kept"));
                ctx.push(Collection::new());
                ctx.register(named("inner"));
                Ok::<_, ()>(())
            })
            .unwrap();
        assert_eq!(ctx.depth(), 0);
        assert!(collection.find("kept").is_some());
        assert!(collection.find("inner").is_none());
    }

    #[test]
    fn test_collect_block_pops_below_scope() {
        let mut ctx = RecordContext::new();
        ctx.push(Collection::new());
        let (collection, _) = ctx
            .collect(|ctx| {
                ctx.register(named("lost"));
                ctx.pop();
                ctx.pop();
                Ok::<_, ()>(())
            })
            .unwrap();
        assert!(collection.is_empty());
        assert_eq!(ctx.depth(), 0);

        // The error path agrees with the return path.
        ctx.push(Collection::new());
        let result = ctx.collect(|ctx| {
            ctx.pop();
            ctx.pop();
            Err::<(), _>("stop")
        });
        assert_eq!(result.unwrap_err(), "stop");
        assert_eq!(ctx.depth(), 0);
    }

    #[test]
    fn test_nested_scopes_resume_outer() {
        let mut ctx = RecordContext::new();
        let (outer, inner) = ctx
            .collect(|ctx| {
                ctx.register(named("before"));
                let (inner, _) = ctx.collect(|ctx| {
                    ctx.register(named("inside"));
                    Ok::<_, ()>(())
                })?;
                ctx.register(named("after"));
                Ok::<_, ()>(inner)
            })
            .unwrap();
        let ids: Vec<_> = outer.records().filter_map(Record::id).collect();
        assert_eq!(ids, vec!["before", "after"]);
        assert!(inner.find("inside").is_some());
    }

    #[test]
    fn test_comment_and_nest() {
        let mut ctx = RecordContext::new();
        assert!(!ctx.comment("nowhere"));
        assert!(ctx.nest(Collection::new()).is_err());

        let (collection, _) = ctx
            .collect(|ctx| {
                assert!(ctx.comment("plants"));
                let mut extra = Collection::new();
                extra.push(named("x1"));
                assert!(ctx.nest(extra).is_ok());
                Ok::<_, ()>(())
            })
            .unwrap();
        assert_eq!(collection.len(), 2);
        assert!(collection.find("x1").is_some());
    }
}
