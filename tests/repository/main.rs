mod support;

mod crud;
mod failures;
mod references;
