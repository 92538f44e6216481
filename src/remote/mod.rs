// Remote backend access: persistence gateway, storage, realtime channel
pub mod gateway;
pub mod realtime;
pub mod supabase;
