pub(crate) mod mongo;
