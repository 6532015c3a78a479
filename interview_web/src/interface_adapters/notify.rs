use crate::domain::{Toast, ToastSink, ToastVariant};

// Toast sink for headless hosts: notifications become log events.
#[derive(Clone, Copy, Default)]
pub struct TracingToastSink;

impl ToastSink for TracingToastSink {
    fn show(&self, toast: Toast) {
        match toast.variant {
            ToastVariant::Destructive => {
                tracing::error!(title = %toast.title, description = %toast.description, "toast")
            }
            ToastVariant::Default => {
                tracing::info!(title = %toast.title, description = %toast.description, "toast")
            }
        }
    }
}
