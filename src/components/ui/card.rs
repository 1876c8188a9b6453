use leptos::prelude::*;
use leptos_ui::clx;

mod components {
    use super::*;
    clx! {Card, div, "bg-card text-card-foreground flex flex-col gap-4 rounded-xl border py-6 shadow-sm"}
    clx! {CardHeader, div, "flex flex-col items-start gap-1.5 px-6"}
    clx! {CardTitle, h1, "leading-none font-semibold"}
    clx! {CardContent, div, "px-6"}
    clx! {CardList, ul, "flex flex-col gap-1"}
    clx! {CardItem, li, "group flex items-center justify-between gap-2 rounded-md px-2 hover:bg-accent/40"}
}

pub use components::*;
