use dioxus::prelude::*;

#[derive(PartialEq, Clone, Copy, Debug)]
pub enum InputKind {
    Text,
    Email,
    Password,
    Tel,
}

impl InputKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputKind::Text => "text",
            InputKind::Email => "email",
            InputKind::Password => "password",
            InputKind::Tel => "tel",
        }
    }

    fn autocomplete(&self) -> &'static str {
        match self {
            InputKind::Text => "off",
            InputKind::Email => "username",
            InputKind::Password => "current-password",
            InputKind::Tel => "tel",
        }
    }
}

#[derive(Props, PartialEq, Clone)]
pub struct FormInputProps {
    pub label: String,
    pub value: String,
    pub kind: InputKind,
    #[props(default)]
    pub placeholder: String,
    #[props(default)]
    pub disabled: bool,
    pub on_change: EventHandler<String>,
}

/// Labelled input row used by the console's forms
#[component]
pub fn FormInput(props: FormInputProps) -> Element {
    rsx! {
        label {
            class: "form-row",
            span { class: "form-label", "{props.label}" }
            input {
                class: "input-field",
                r#type: "{props.kind.as_str()}",
                autocomplete: "{props.kind.autocomplete()}",
                value: "{props.value}",
                placeholder: "{props.placeholder}",
                disabled: props.disabled,
                oninput: move |event| props.on_change.call(event.value())
            }
        }
    }
}
