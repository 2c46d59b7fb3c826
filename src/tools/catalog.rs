//! Declarative tool catalog.
//!
//! One row per exposed tool: name, presentation metadata, input parameters and the
//! upstream mapping. The registry turns rows into schemas and dispatch; nothing
//! else in the crate knows tool-specific field lists. Parameter names are the
//! upstream field names, so payload construction is pure passthrough plus the
//! row's constant fields.

use serde_json::{json, Map, Value};

pub type JsonObject = Map<String, Value>;

pub struct ToolDef {
    pub name: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub params: Vec<ParamSpec>,
    pub dispatch: Dispatch,
}

pub enum Dispatch {
    /// Liveness probe; answered locally.
    Ping,
    /// POST to a Doctoc endpoint: constants merged first, then present arguments.
    Doctoc {
        endpoint: &'static str,
        constants: JsonObject,
    },
    /// `getPricesAPI`, falling back to appointment types when the price list fails.
    PricesWithFallback { constants: JsonObject },
    /// Unipile GET /chats (account_type pinned to TELEGRAM, limit defaults to 10).
    ListChats,
    /// Unipile GET /chats/{chat_id}/messages (limit defaults to 20).
    ReadMessages,
    /// Unipile multipart POST of a single text field.
    SendMessage,
}

pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamKind,
    pub required: bool,
    pub default: Option<Value>,
    pub desc: &'static str,
}

pub enum ParamKind {
    Str,
    Num,
    Enum(&'static [&'static str]),
    Obj,
    ObjArray(&'static [ItemField]),
}

pub struct ItemField {
    pub name: &'static str,
    pub kind: Scalar,
    pub desc: &'static str,
}

pub enum Scalar {
    Str,
    Num,
}

impl Scalar {
    fn type_name(&self) -> &'static str {
        match self {
            Scalar::Str => "string",
            Scalar::Num => "number",
        }
    }
}

impl ParamSpec {
    fn required(name: &'static str, kind: ParamKind, desc: &'static str) -> Self {
        Self { name, kind, required: true, default: None, desc }
    }

    fn optional(name: &'static str, kind: ParamKind, desc: &'static str) -> Self {
        Self { name, kind, required: false, default: None, desc }
    }

    fn with_default(mut self, v: Value) -> Self {
        self.default = Some(v);
        self
    }

    fn schema(&self) -> Value {
        match &self.kind {
            ParamKind::Str => json!({"type": "string", "description": self.desc}),
            ParamKind::Num => json!({"type": "number", "description": self.desc}),
            ParamKind::Enum(values) => {
                json!({"type": "string", "enum": values, "description": self.desc})
            }
            ParamKind::Obj => {
                json!({"type": "object", "additionalProperties": true, "description": self.desc})
            }
            ParamKind::ObjArray(fields) => {
                let mut props = JsonObject::new();
                let mut required = Vec::new();
                for f in fields.iter() {
                    props.insert(
                        f.name.to_string(),
                        json!({"type": f.kind.type_name(), "description": f.desc}),
                    );
                    required.push(Value::String(f.name.to_string()));
                }
                json!({
                    "type": "array",
                    "description": self.desc,
                    "items": {"type": "object", "properties": props, "required": required}
                })
            }
        }
    }
}

impl ToolDef {
    /// JSON schema published for this tool's arguments.
    pub fn input_schema(&self) -> Value {
        let mut props = JsonObject::new();
        let mut required = Vec::new();
        for p in &self.params {
            props.insert(p.name.to_string(), p.schema());
            if p.required {
                required.push(Value::String(p.name.to_string()));
            }
        }
        json!({"type": "object", "properties": props, "required": required})
    }
}

fn consts(v: Value) -> JsonObject {
    v.as_object().cloned().unwrap_or_default()
}

const SEARCH_TYPES: &[&str] = &[
    "nombre",
    "dni",
    "telefono",
    "id",
    "pasaporte",
    "cedula_identidad",
    "carnet_extranjeria",
];

const PAYMENT_ITEM_FIELDS: &[ItemField] = &[
    ItemField { name: "name", kind: Scalar::Str, desc: "Nombre del servicio" },
    ItemField { name: "quantity", kind: Scalar::Num, desc: "Cantidad" },
    ItemField { name: "price", kind: Scalar::Num, desc: "Precio unitario" },
    ItemField { name: "subTotal", kind: Scalar::Num, desc: "Subtotal" },
];

const PAYMENT_ENTRY_FIELDS: &[ItemField] = &[
    ItemField { name: "method", kind: Scalar::Str, desc: "Metodo de pago (efectivo, tarjeta, etc.)" },
    ItemField { name: "amount", kind: Scalar::Num, desc: "Monto pagado" },
    ItemField { name: "moneda", kind: Scalar::Str, desc: "Moneda del pago" },
];

/// The full tool table, in registration order. Built once at startup.
pub fn catalog() -> Vec<ToolDef> {
    use self::ParamKind::*;
    use self::ParamSpec as P;

    vec![
        ToolDef {
            name: "ping",
            title: "Ping",
            description: "Verifica que el servidor MCP esta activo y responde correctamente",
            params: vec![],
            dispatch: Dispatch::Ping,
        },
        // ── Organizacion ──
        ToolDef {
            name: "get_org_basic_info",
            title: "Informacion de la organizacion",
            description: "Obtiene informacion basica de la clinica (nombre, direccion, contacto)",
            params: vec![],
            dispatch: Dispatch::Doctoc {
                endpoint: "getOrganizationInfoAPI",
                constants: consts(json!({"sections": ["basic"]})),
            },
        },
        ToolDef {
            name: "get_org_locations",
            title: "Sedes de la organizacion",
            description: "Lista las sedes/sucursales de la clinica",
            params: vec![],
            dispatch: Dispatch::Doctoc {
                endpoint: "getOrganizationInfoAPI",
                constants: consts(json!({"sections": ["sedes"]})),
            },
        },
        ToolDef {
            name: "get_org_specialties",
            title: "Especialidades de la organizacion",
            description: "Lista las especialidades medicas disponibles en la clinica",
            params: vec![],
            dispatch: Dispatch::Doctoc {
                endpoint: "getOrganizationInfoAPI",
                constants: consts(json!({"sections": ["specialties"]})),
            },
        },
        ToolDef {
            name: "get_org_users",
            title: "Usuarios de la organizacion",
            description: "Lista los medicos y personal de la clinica",
            params: vec![],
            dispatch: Dispatch::Doctoc {
                endpoint: "getOrganizationInfoAPI",
                constants: consts(json!({"sections": ["users"]})),
            },
        },
        // ── Usuarios / medicos ──
        ToolDef {
            name: "get_user_info",
            title: "Info del medico",
            description: "Obtiene informacion basica y profesional de un medico por su uid",
            params: vec![P::required("uid", Str, "UID del medico/usuario")],
            dispatch: Dispatch::Doctoc {
                endpoint: "getUserInfoAPI",
                constants: consts(json!({"sections": ["basic", "professional"]})),
            },
        },
        ToolDef {
            name: "get_user_calendar",
            title: "Calendario del medico",
            description: "Obtiene la configuracion del calendario de un medico (horarios, disponibilidad)",
            params: vec![P::required("uid", Str, "UID del medico")],
            dispatch: Dispatch::Doctoc {
                endpoint: "getUserInfoAPI",
                constants: consts(json!({"sections": ["calendarInfo"]})),
            },
        },
        ToolDef {
            name: "get_appointment_types",
            title: "Tipos de cita",
            description: "Lista todos los tipos de cita disponibles en la organizacion",
            params: vec![],
            dispatch: Dispatch::Doctoc {
                endpoint: "getUserInfoAPI",
                constants: consts(json!({"sections": ["tipos"]})),
            },
        },
        ToolDef {
            name: "update_user_calendar",
            title: "Actualizar calendario",
            description: "Actualiza la configuracion del calendario de un medico",
            params: vec![
                P::required("uid", Str, "UID del medico"),
                P::required("calendarData", Obj, "Datos del calendario a actualizar"),
            ],
            dispatch: Dispatch::Doctoc {
                endpoint: "getUserInfoAPI",
                constants: consts(json!({"action": "update"})),
            },
        },
        // ── Pacientes ──
        ToolDef {
            name: "get_all_patients",
            title: "Listar pacientes",
            description: "Lista todos los pacientes de la organizacion (paginado)",
            params: vec![
                P::optional("limit", Num, "Cantidad maxima de resultados (default 50)")
                    .with_default(json!(50)),
                P::optional("startAfter", Str, "ID del ultimo paciente para paginacion"),
            ],
            dispatch: Dispatch::Doctoc {
                endpoint: "managePatientsAPI",
                constants: consts(json!({"action": "getAll"})),
            },
        },
        ToolDef {
            name: "search_patients",
            title: "Buscar pacientes",
            description: "Busca pacientes por nombre, DNI, telefono, ID u otro identificador",
            params: vec![
                P::required("type", Enum(SEARCH_TYPES), "Tipo de busqueda"),
                P::required("text", Str, "Texto a buscar"),
                P::optional("limit", Num, "Cantidad maxima de resultados"),
            ],
            dispatch: Dispatch::Doctoc {
                endpoint: "managePatientsAPI",
                constants: consts(json!({"action": "search"})),
            },
        },
        ToolDef {
            name: "create_patient",
            title: "Crear paciente",
            description: "Registra un nuevo paciente en el sistema",
            params: vec![
                P::required("names", Str, "Nombres del paciente"),
                P::required("surnames", Str, "Apellidos del paciente"),
                P::required("dni", Str, "DNI o documento de identidad"),
                P::required("birth_date", Str, "Fecha de nacimiento (YYYY-MM-DD)"),
                P::required("gender", Str, "Genero: masculino o femenino"),
                P::optional("phone", Str, "Telefono del paciente"),
                P::optional("mail", Str, "Email del paciente"),
            ],
            dispatch: Dispatch::Doctoc {
                endpoint: "managePatientsAPI",
                constants: consts(json!({"action": "create"})),
            },
        },
        ToolDef {
            name: "update_patient",
            title: "Actualizar paciente",
            description: "Actualiza datos de un paciente existente",
            params: vec![
                P::required("patient_id", Str, "ID del paciente"),
                P::optional("names", Str, "Nombres"),
                P::optional("surnames", Str, "Apellidos"),
                P::optional("phone", Str, "Telefono"),
                P::optional("mail", Str, "Email"),
                P::optional("birth_date", Str, "Fecha de nacimiento (YYYY-MM-DD)"),
                P::optional("gender", Str, "Genero"),
            ],
            dispatch: Dispatch::Doctoc {
                endpoint: "managePatientsAPI",
                constants: consts(json!({"action": "update"})),
            },
        },
        ToolDef {
            name: "delete_patient",
            title: "Eliminar paciente",
            description: "Elimina un paciente del sistema (irreversible)",
            params: vec![P::required("patient_id", Str, "ID del paciente a eliminar")],
            dispatch: Dispatch::Doctoc {
                endpoint: "managePatientsAPI",
                constants: consts(json!({"action": "delete"})),
            },
        },
        // ── Citas medicas ──
        ToolDef {
            name: "create_appointment",
            title: "Crear cita",
            description: "Crea una nueva cita medica en el sistema",
            params: vec![
                P::required("dayKey", Str, "Dia de la cita en formato DD-MM-YYYY"),
                P::required("scheduledStart", Str, "Hora de inicio ISO 8601 (ej: 2025-02-10T09:00:00)"),
                P::required("scheduledEnd", Str, "Hora de fin ISO 8601"),
                P::required("patient", Str, "ID del paciente"),
                P::required("userId", Str, "UID del medico"),
                P::required("type", Str, "Nombre del tipo de cita"),
                P::optional("typeId", Str, "ID del tipo de cita"),
                P::required("motive", Str, "Motivo de la consulta"),
                P::optional("status", Str, "Estado inicial (default: pending)"),
                P::optional("locationId", Str, "ID de la sede"),
                P::optional("category", Str, "Categoria de la cita"),
            ],
            dispatch: Dispatch::Doctoc {
                endpoint: "manageQuotesAPI",
                constants: consts(json!({"action": "create"})),
            },
        },
        ToolDef {
            name: "update_appointment",
            title: "Actualizar cita",
            description: "Modifica una cita existente (horario, estado, medico, etc.)",
            params: vec![
                P::required("quoteID", Str, "ID de la cita"),
                P::required("dayKey", Str, "Dia de la cita (DD-MM-YYYY)"),
                P::optional("oldDayKey", Str, "Dia original si se cambia de fecha"),
                P::optional("scheduledStart", Str, "Nueva hora inicio ISO"),
                P::optional("scheduledEnd", Str, "Nueva hora fin ISO"),
                P::optional("patient", Str, "ID del paciente"),
                P::optional("userId", Str, "UID del medico"),
                P::optional("type", Str, "Tipo de cita"),
                P::optional("motive", Str, "Motivo"),
                P::optional("status", Str, "Nuevo estado"),
            ],
            dispatch: Dispatch::Doctoc {
                endpoint: "manageQuotesAPI",
                constants: consts(json!({"action": "update"})),
            },
        },
        ToolDef {
            name: "cancel_appointment",
            title: "Cancelar cita",
            description: "Cancela una cita medica existente",
            params: vec![
                P::required("quoteID", Str, "ID de la cita"),
                P::required("dayKey", Str, "Dia de la cita (DD-MM-YYYY)"),
                P::required("userId", Str, "UID del medico"),
                P::optional("cancelReason", Str, "Razon de la cancelacion"),
            ],
            dispatch: Dispatch::Doctoc {
                endpoint: "manageQuotesAPI",
                constants: consts(json!({"action": "cancel"})),
            },
        },
        ToolDef {
            name: "get_patient_appointments",
            title: "Citas del paciente",
            description: "Obtiene todas las citas de un paciente especifico",
            params: vec![P::required("patientID", Str, "ID del paciente")],
            dispatch: Dispatch::Doctoc {
                endpoint: "getPatientQuoteAPI",
                constants: JsonObject::new(),
            },
        },
        ToolDef {
            name: "get_day_appointments",
            title: "Citas del dia",
            description: "Lista todas las citas de un dia especifico. Puede filtrar por medico.",
            params: vec![
                P::required("dayKey", Str, "Dia en formato DD-MM-YYYY"),
                P::optional("userId", Str, "UID del medico para filtrar"),
                P::optional("citaID", Str, "ID de una cita especifica"),
            ],
            dispatch: Dispatch::Doctoc {
                endpoint: "getDayQuotesAPI",
                constants: JsonObject::new(),
            },
        },
        ToolDef {
            name: "get_busy_slots",
            title: "Horarios ocupados",
            description: "Obtiene los rangos horarios ocupados de un dia (util para encontrar disponibilidad)",
            params: vec![
                P::required("dayKey", Str, "Dia en formato DD-MM-YYYY"),
                P::optional("userId", Str, "UID del medico"),
            ],
            dispatch: Dispatch::Doctoc {
                endpoint: "getDayQuotesAPI",
                constants: consts(json!({"format": "busy_ranges"})),
            },
        },
        ToolDef {
            name: "get_user_day_appointments",
            title: "Citas del medico en un dia",
            description: "Obtiene todas las citas de un medico especifico en un dia determinado",
            params: vec![
                P::required("dayKey", Str, "Dia en formato DD-MM-YYYY"),
                P::required("userId", Str, "UID del medico"),
            ],
            dispatch: Dispatch::Doctoc {
                endpoint: "getDayQuotesAPI",
                constants: JsonObject::new(),
            },
        },
        // ── Precios ──
        ToolDef {
            name: "get_prices",
            title: "Listar precios",
            description: "Obtiene la lista de precios de servicios medicos",
            params: vec![P::optional("categoriaID", Str, "ID de categoria para filtrar")],
            dispatch: Dispatch::PricesWithFallback {
                constants: consts(json!({"action": "prices"})),
            },
        },
        ToolDef {
            name: "get_price_categories",
            title: "Categorias de precios",
            description: "Lista las categorias de precios disponibles",
            params: vec![],
            dispatch: Dispatch::Doctoc {
                endpoint: "getPricesAPI",
                constants: consts(json!({"action": "categories"})),
            },
        },
        ToolDef {
            name: "get_prices_and_categories",
            title: "Precios y categorias",
            description: "Obtiene precios y categorias juntos en una sola llamada",
            params: vec![],
            dispatch: Dispatch::Doctoc {
                endpoint: "getPricesAPI",
                constants: consts(json!({"action": "both"})),
            },
        },
        // ── Pagos ──
        ToolDef {
            name: "create_payment",
            title: "Crear pago",
            description: "Registra un nuevo pago/cobro en el sistema",
            params: vec![
                P::required("patient", Str, "ID del paciente"),
                P::required("motive", Str, "Motivo del pago"),
                P::required("time", Str, "Fecha del pago (YYYY-MM-DD)"),
                P::required("moneda", Str, "Moneda (PEN, USD, etc.)"),
                P::required("campos", ObjArray(PAYMENT_ITEM_FIELDS), "Detalle de items"),
                P::required("pagos", ObjArray(PAYMENT_ENTRY_FIELDS), "Detalle de pagos realizados"),
                P::required("person", Str, "ID del usuario que registra"),
                P::optional("sedeID", Str, "ID de la sede"),
                P::optional("status", Str, "Estado del pago"),
            ],
            dispatch: Dispatch::Doctoc {
                endpoint: "managePaymentAPI",
                constants: JsonObject::new(),
            },
        },
        ToolDef {
            name: "get_patient_payments",
            title: "Pagos del paciente",
            description: "Lista todos los pagos de un paciente",
            params: vec![P::required("patientID", Str, "ID del paciente")],
            dispatch: Dispatch::Doctoc {
                endpoint: "getPatientPaymentsAPI",
                constants: JsonObject::new(),
            },
        },
        ToolDef {
            name: "get_day_payments",
            title: "Pagos del dia",
            description: "Lista todos los pagos registrados en un dia",
            params: vec![P::required("date", Str, "Fecha en formato YYYY-MM-DD")],
            dispatch: Dispatch::Doctoc {
                endpoint: "getDayPaymentsAPI",
                constants: JsonObject::new(),
            },
        },
        // ── Telegram (via Unipile) ──
        ToolDef {
            name: "list_telegram_chats",
            title: "Listar chats de Telegram",
            description: "Lista los chats de Telegram disponibles para encontrar el chat_id correcto",
            params: vec![
                P::optional("limit", Num, "Cantidad de chats (default 10)"),
                P::optional("cursor", Str, "Cursor para paginacion"),
            ],
            dispatch: Dispatch::ListChats,
        },
        ToolDef {
            name: "read_telegram_messages",
            title: "Leer mensajes de Telegram",
            description: "Lee los mensajes recientes de un chat de Telegram",
            params: vec![
                P::required("chat_id", Str, "ID del chat de Telegram"),
                P::optional("limit", Num, "Cantidad de mensajes (default 20)"),
            ],
            dispatch: Dispatch::ReadMessages,
        },
        ToolDef {
            name: "send_telegram_message",
            title: "Enviar mensaje por Telegram",
            description: "Envia un mensaje de texto a un chat de Telegram via Unipile",
            params: vec![
                P::required("chat_id", Str, "ID del chat de Telegram"),
                P::required("text", Str, "Texto del mensaje a enviar"),
            ],
            dispatch: Dispatch::SendMessage,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const DOCTOC_ENDPOINTS: &[&str] = &[
        "getOrganizationInfoAPI",
        "getUserInfoAPI",
        "managePatientsAPI",
        "manageQuotesAPI",
        "getPatientQuoteAPI",
        "getDayQuotesAPI",
        "getPricesAPI",
        "managePaymentAPI",
        "getPatientPaymentsAPI",
        "getDayPaymentsAPI",
    ];

    #[test]
    fn it_declares_thirty_uniquely_named_tools() {
        let defs = catalog();
        assert_eq!(defs.len(), 30);
        let names: HashSet<_> = defs.iter().map(|d| d.name).collect();
        assert_eq!(names.len(), 30);
    }

    #[test]
    fn doctoc_endpoints_come_from_the_fixed_set() {
        for def in catalog() {
            if let Dispatch::Doctoc { endpoint, .. } = &def.dispatch {
                assert!(
                    DOCTOC_ENDPOINTS.contains(endpoint),
                    "{} uses unexpected endpoint {endpoint}",
                    def.name
                );
            }
        }
    }

    #[test]
    fn schemas_list_required_params() {
        let defs = catalog();
        let send = defs.iter().find(|d| d.name == "send_telegram_message").unwrap();
        let schema = send.input_schema();
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["properties"]["chat_id"]["type"], "string");
        let required: Vec<_> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap().to_string())
            .collect();
        assert_eq!(required, ["chat_id", "text"]);
    }

    #[test]
    fn list_chats_params_are_optional() {
        let defs = catalog();
        let list = defs.iter().find(|d| d.name == "list_telegram_chats").unwrap();
        let schema = list.input_schema();
        assert!(schema["required"].as_array().unwrap().is_empty());
        assert_eq!(schema["properties"]["limit"]["type"], "number");
    }

    #[test]
    fn search_patients_enumerates_identifier_types() {
        let defs = catalog();
        let search = defs.iter().find(|d| d.name == "search_patients").unwrap();
        let schema = search.input_schema();
        let kinds = schema["properties"]["type"]["enum"].as_array().unwrap();
        assert_eq!(kinds.len(), 7);
        assert!(kinds.contains(&serde_json::json!("carnet_extranjeria")));
    }

    #[test]
    fn payment_items_schema_nests_object_fields() {
        let defs = catalog();
        let pay = defs.iter().find(|d| d.name == "create_payment").unwrap();
        let schema = pay.input_schema();
        let items = &schema["properties"]["campos"]["items"];
        assert_eq!(items["properties"]["subTotal"]["type"], "number");
        assert_eq!(items["properties"]["name"]["type"], "string");
    }
}
